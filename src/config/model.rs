//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a packfuse run.
///
/// This struct represents the contents of `packfuse.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Similarity settings
    // =========================================================================
    /// Minimum overall score for two folder names to cluster together.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Minimum overall score for unsupervised auto-merge.
    #[serde(default = "default_strong_similarity_threshold")]
    pub strong_similarity_threshold: f64,

    // =========================================================================
    // Fusion settings
    // =========================================================================
    /// Clusters with fewer members are not fused.
    #[serde(default = "default_min_group_size")]
    pub min_group_size: usize,

    /// Clusters with more members are not fused.
    #[serde(default = "default_max_group_size")]
    pub max_group_size: usize,

    /// Use the full `/Family/Type/Style[/Format]/Canonical[/Variant]` target
    /// form instead of `/Family/Type/Canonical`.
    #[serde(default = "default_true")]
    pub use_full_path: bool,

    /// Source-pack overlap above which two fusion groups conflict.
    #[serde(default = "default_conflict_threshold")]
    pub conflict_threshold: f64,

    /// Size estimate per file when a pack does not report its total size.
    #[serde(default = "default_estimated_bytes_per_file")]
    pub estimated_bytes_per_file: u64,

    // =========================================================================
    // Planning settings
    // =========================================================================
    /// Hierarchy used for files that are not fused.
    #[serde(default)]
    pub hierarchy_template: HierarchyTemplate,

    /// Move or copy standard files.
    #[serde(default)]
    pub operation_mode: OperationMode,

    /// Optional taxonomy file (YAML or JSON) with function names per type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy_path: Option<PathBuf>,

    /// File-name globs that are never planned.
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Throughput assumed for duration estimates.
    #[serde(default = "default_throughput_bytes_per_sec")]
    pub throughput_bytes_per_sec: u64,

    // =========================================================================
    // Execution settings
    // =========================================================================
    /// What to do when a target file already exists.
    #[serde(default)]
    pub conflict_resolution: ConflictStrategy,

    /// Roll back executed operations after a fatal error.
    #[serde(default = "default_true")]
    pub enable_rollback: bool,

    /// Number of accumulated errors that aborts the remaining plan.
    #[serde(default = "default_critical_error_threshold")]
    pub critical_error_threshold: usize,

    /// Record per-file fusion moves so fusion can be rolled back.
    #[serde(default = "default_true")]
    pub capture_fusion_backup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            strong_similarity_threshold: default_strong_similarity_threshold(),
            min_group_size: default_min_group_size(),
            max_group_size: default_max_group_size(),
            use_full_path: default_true(),
            conflict_threshold: default_conflict_threshold(),
            estimated_bytes_per_file: default_estimated_bytes_per_file(),
            hierarchy_template: HierarchyTemplate::default(),
            operation_mode: OperationMode::default(),
            taxonomy_path: None,
            ignore_patterns: default_ignore_patterns(),
            throughput_bytes_per_sec: default_throughput_bytes_per_sec(),
            conflict_resolution: ConflictStrategy::default(),
            enable_rollback: default_true(),
            critical_error_threshold: default_critical_error_threshold(),
            capture_fusion_backup: default_true(),
        }
    }
}
