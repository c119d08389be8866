//! Configuration types and defaults for packfuse.
//!
//! This module defines enums, constants, and default value functions
//! used by the Config struct.

use serde::{Deserialize, Serialize};

/// Target hierarchy used for standard (non-fused) files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyTemplate {
    /// Family / Style / Type / Function (default).
    #[default]
    GenreFirst,
    /// Type / Function / Family / Style.
    TypeFirst,
    /// Type / Function.
    Flat,
}

/// One level of a hierarchy template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyLevel {
    Family,
    Style,
    Type,
    Function,
}

impl HierarchyTemplate {
    /// Parse a hierarchy template from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "genre_first" => Some(Self::GenreFirst),
            "type_first" => Some(Self::TypeFirst),
            "flat" => Some(Self::Flat),
            _ => None,
        }
    }

    /// Ordered folder levels below the target root.
    pub fn levels(&self) -> &'static [HierarchyLevel] {
        match self {
            HierarchyTemplate::GenreFirst => &[
                HierarchyLevel::Family,
                HierarchyLevel::Style,
                HierarchyLevel::Type,
                HierarchyLevel::Function,
            ],
            HierarchyTemplate::TypeFirst => &[
                HierarchyLevel::Type,
                HierarchyLevel::Function,
                HierarchyLevel::Family,
                HierarchyLevel::Style,
            ],
            HierarchyTemplate::Flat => &[HierarchyLevel::Type, HierarchyLevel::Function],
        }
    }
}

/// Whether standard file operations move or copy files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    /// Move files into the target tree (default).
    #[default]
    Move,
    /// Copy files, leaving the sources untouched.
    Copy,
}

/// How the executor handles a target path that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStrategy {
    /// Replace the existing target. The displaced file is parked until the run succeeds.
    Overwrite,
    /// Leave the existing target alone and mark the operation skipped.
    Skip,
    /// Append `_N` to the file stem until the name is free (default).
    #[default]
    Rename,
    /// Interactive choice. Not supported by the executor; behaves like `Rename`.
    Ask,
}

impl ConflictStrategy {
    /// Parse a conflict strategy from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "overwrite" => Some(Self::Overwrite),
            "skip" => Some(Self::Skip),
            "rename" => Some(Self::Rename),
            "ask" => Some(Self::Ask),
            _ => None,
        }
    }

    /// The strategy the executor actually applies.
    pub fn effective(self) -> Self {
        match self {
            ConflictStrategy::Ask => ConflictStrategy::Rename,
            other => other,
        }
    }
}

/// Default file-name globs that never count as pack content.
pub fn default_ignore_patterns() -> Vec<String> {
    vec![
        ".DS_Store".to_string(),
        "Thumbs.db".to_string(),
        "desktop.ini".to_string(),
        "._*".to_string(),
    ]
}

// Default value functions for serde
pub(crate) fn default_similarity_threshold() -> f64 {
    0.65
}
pub(crate) fn default_strong_similarity_threshold() -> f64 {
    0.80
}
pub(crate) fn default_min_group_size() -> usize {
    2
}
pub(crate) fn default_max_group_size() -> usize {
    50
}
pub(crate) fn default_conflict_threshold() -> f64 {
    0.5
}
pub(crate) fn default_estimated_bytes_per_file() -> u64 {
    1024 * 1024
}
pub(crate) fn default_throughput_bytes_per_sec() -> u64 {
    50 * 1024 * 1024
}
pub(crate) fn default_critical_error_threshold() -> usize {
    10
}
pub(crate) fn default_true() -> bool {
    true
}
