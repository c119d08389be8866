//! Fusion-group construction.
//!
//! A fusion group consolidates the folders of one cluster, spread across
//! several packs, into a single target directory. Building groups is pure:
//! nothing here touches the filesystem.

mod builder;
mod conflicts;
mod target_path;

#[cfg(test)]
mod tests;

pub use builder::{FusionBuildOutcome, FusionGroupBuilder, complexity_score, duplicate_risk};
pub use conflicts::{AppliedConflicts, apply_conflict_resolutions, detect_conflicts};
pub use target_path::{UNNAMED_SEGMENT, generate_target_path, sanitize_segment};

use crate::config::Config;
use serde::{Deserialize, Serialize};

/// Tunables for building fusion groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionOptions {
    pub min_group_size: usize,
    pub max_group_size: usize,
    pub use_full_path: bool,
    pub conflict_threshold: f64,
    pub estimated_bytes_per_file: u64,
}

impl Default for FusionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl FusionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_group_size: config.min_group_size,
            max_group_size: config.max_group_size,
            use_full_path: config.use_full_path,
            conflict_threshold: config.conflict_threshold,
            estimated_bytes_per_file: config.estimated_bytes_per_file,
        }
    }
}

/// Source of fusion group ids: `fusion_0001`, `fusion_0002`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    prefix: String,
    next: u64,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new("fusion")
    }
}

impl IdSequence {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("{}_{:04}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
