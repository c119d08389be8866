//! Implementation of the `packfuse similarity` command.

use super::to_pretty_json;
use crate::cli::SimilarityArgs;
use crate::config::Config;
use crate::error::Result;
use crate::similarity::SimilarityScorer;

/// Score two folder names and print the breakdown.
pub fn cmd_similarity(args: SimilarityArgs, config: &Config) -> Result<()> {
    let scorer = SimilarityScorer::from_config(config);
    let score = scorer.score(&args.a, &args.b);

    if args.json {
        println!("{}", to_pretty_json(&score)?);
        return Ok(());
    }

    println!("'{}' vs '{}'", args.a, args.b);
    println!();
    println!("  token overlap: {:.3}", score.token_overlap);
    println!("  levenshtein:   {:.3}", score.levenshtein);
    println!("  permutation:   {:.3}", score.permutation);
    println!("  phonetic:      {:.3}", score.phonetic);
    println!("  contextual:    {:.3}", score.contextual);
    println!("  overall:       {:.3}", score.overall);
    println!();

    let verdict = if score.is_strongly_similar(scorer.strong_threshold) {
        "strongly similar (auto-merge)"
    } else if score.is_similar(scorer.threshold) {
        "similar"
    } else {
        "not similar"
    };
    println!("Verdict: {}", verdict);

    Ok(())
}
