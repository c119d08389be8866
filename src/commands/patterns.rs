//! Implementation of the `packfuse patterns` command.

use super::to_pretty_json;
use crate::cli::PatternsArgs;
use crate::error::Result;
use crate::similarity::detect_common_patterns;

/// Print the spelling-variant groups found among the given names.
pub fn cmd_patterns(args: PatternsArgs) -> Result<()> {
    let patterns = detect_common_patterns(&args.names);

    if args.json {
        println!("{}", to_pretty_json(&patterns)?);
        return Ok(());
    }

    if patterns.is_empty() {
        println!("No common patterns found.");
        return Ok(());
    }

    for pattern in &patterns {
        println!("{:?} '{}':", pattern.kind, pattern.pattern);
        for member in &pattern.members {
            println!("  - {}", member);
        }
    }

    Ok(())
}
