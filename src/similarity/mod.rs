//! Fuzzy folder-name similarity.
//!
//! Two folder names are compared with five independent signals, each in
//! `[0, 1]` and symmetric in its arguments:
//!
//! 1. token overlap: Jaccard index of the token sets
//! 2. levenshtein: `1 - distance / max_len` on the normalized names
//! 3. permutation: 1.0 for the same tokens in any order
//! 4. phonetic: positional agreement of Soundex codes
//! 5. contextual: shared parent, depth and siblings (0.5 when unknown)
//!
//! `overall` is a fixed weighted sum of the five. Names that normalize to the
//! same string short-circuit to a perfect score.

mod normalize;
mod patterns;
mod phonetic;


pub use normalize::{normalize, singularize, tokenize};
pub use patterns::{NamePattern, PatternKind, detect_common_patterns};
pub use phonetic::soundex;

use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const TOKEN_OVERLAP_WEIGHT: f64 = 0.35;
pub const LEVENSHTEIN_WEIGHT: f64 = 0.25;
pub const PERMUTATION_WEIGHT: f64 = 0.20;
pub const PHONETIC_WEIGHT: f64 = 0.10;
pub const CONTEXTUAL_WEIGHT: f64 = 0.10;

/// Threshold for clustering candidates.
pub const DEFAULT_SIMILAR_THRESHOLD: f64 = 0.65;
/// Threshold for unsupervised auto-merge.
pub const DEFAULT_STRONG_THRESHOLD: f64 = 0.80;

/// Contextual score when either side has no context.
const NEUTRAL_CONTEXT: f64 = 0.5;

/// Where a folder sits in its source tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FolderContext {
    pub parent: String,
    pub depth: usize,
    #[serde(default)]
    pub siblings: Vec<String>,
}

impl FolderContext {
    /// Context of a folder path, with sibling folder names supplied by the caller.
    pub fn from_path(path: &Path, siblings: Vec<String>) -> Self {
        Self {
            parent: path
                .parent()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
            depth: crate::fs::path_depth(path),
            siblings,
        }
    }
}

/// Per-signal breakdown of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScore {
    pub token_overlap: f64,
    pub levenshtein: f64,
    pub permutation: f64,
    pub phonetic: f64,
    pub contextual: f64,
    pub overall: f64,
}

impl SimilarityScore {
    fn perfect() -> Self {
        Self {
            token_overlap: 1.0,
            levenshtein: 1.0,
            permutation: 1.0,
            phonetic: 1.0,
            contextual: 1.0,
            overall: 1.0,
        }
    }

    pub fn is_similar(&self, threshold: f64) -> bool {
        self.overall >= threshold
    }

    pub fn is_strongly_similar(&self, threshold: f64) -> bool {
        self.overall >= threshold
    }
}

/// Compare two folder names, optionally with their tree context.
pub fn score(
    name_a: &str,
    name_b: &str,
    context_a: Option<&FolderContext>,
    context_b: Option<&FolderContext>,
) -> SimilarityScore {
    let norm_a = normalize(name_a);
    let norm_b = normalize(name_b);

    if norm_a == norm_b {
        return SimilarityScore::perfect();
    }

    let tokens_a = tokenize(name_a);
    let tokens_b = tokenize(name_b);

    let token_overlap = jaccard(&tokens_a, &tokens_b);
    let levenshtein = levenshtein_similarity(&norm_a, &norm_b);
    let permutation = permutation_score(&tokens_a, &tokens_b, token_overlap);
    let phonetic = phonetic::code_similarity(&soundex(&norm_a), &soundex(&norm_b));
    let contextual = contextual_score(context_a, context_b);

    let overall = TOKEN_OVERLAP_WEIGHT * token_overlap
        + LEVENSHTEIN_WEIGHT * levenshtein
        + PERMUTATION_WEIGHT * permutation
        + PHONETIC_WEIGHT * phonetic
        + CONTEXTUAL_WEIGHT * contextual;

    SimilarityScore {
        token_overlap,
        levenshtein,
        permutation,
        phonetic,
        contextual,
        overall: overall.clamp(0.0, 1.0),
    }
}

/// `1 - distance / max_len` over characters; 1.0 for two empty strings.
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - strsim::levenshtein(a, b) as f64 / max_len as f64
}

fn jaccard(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let set_a: HashSet<&String> = a.iter().collect();
    let set_b: HashSet<&String> = b.iter().collect();
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

fn permutation_score(a: &[String], b: &[String], token_overlap: f64) -> f64 {
    let mut sorted_a: Vec<&String> = a.iter().collect();
    let mut sorted_b: Vec<&String> = b.iter().collect();
    sorted_a.sort();
    sorted_b.sort();

    if sorted_a == sorted_b {
        1.0
    } else if a.len() != b.len() {
        token_overlap * 0.5
    } else {
        token_overlap
    }
}

fn contextual_score(a: Option<&FolderContext>, b: Option<&FolderContext>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return NEUTRAL_CONTEXT;
    };

    let mut score = 0.0;
    if a.parent == b.parent {
        score += 0.5;
    }
    if a.depth == b.depth {
        score += 0.3;
    }

    let siblings_a: HashSet<String> = a.siblings.iter().map(|s| normalize(s)).collect();
    let siblings_b: HashSet<String> = b.siblings.iter().map(|s| normalize(s)).collect();
    let union = siblings_a.union(&siblings_b).count();
    if union > 0 {
        let shared = siblings_a.intersection(&siblings_b).count();
        score += 0.2 * (shared as f64 / union as f64);
    }

    f64::min(score, 1.0)
}

/// Scorer carrying the configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScorer {
    pub threshold: f64,
    pub strong_threshold: f64,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILAR_THRESHOLD,
            strong_threshold: DEFAULT_STRONG_THRESHOLD,
        }
    }
}

impl SimilarityScorer {
    pub fn from_config(config: &Config) -> Self {
        Self {
            threshold: config.similarity_threshold,
            strong_threshold: config.strong_similarity_threshold,
        }
    }

    pub fn score(&self, a: &str, b: &str) -> SimilarityScore {
        score(a, b, None, None)
    }

    pub fn score_with_context(
        &self,
        a: &str,
        b: &str,
        context_a: &FolderContext,
        context_b: &FolderContext,
    ) -> SimilarityScore {
        score(a, b, Some(context_a), Some(context_b))
    }

    /// Candidate for clustering.
    pub fn similar(&self, a: &str, b: &str) -> bool {
        self.score(a, b).is_similar(self.threshold)
    }

    /// Safe for unsupervised auto-merge.
    pub fn strongly_similar(&self, a: &str, b: &str) -> bool {
        self.score(a, b).is_strongly_similar(self.strong_threshold)
    }
}
