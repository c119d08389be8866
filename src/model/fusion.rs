//! Fusion groups and the conflicts detected between them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Classification resolved for a whole fusion group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupClassification {
    pub family: String,
    pub style: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

/// One contributing folder of a fusion group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFileMapping {
    pub pack_id: String,
    pub pack_name: String,
    pub original_path: PathBuf,
    pub file_count: usize,
    pub estimated_size: u64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub pack_count: usize,
    pub duplicate_risk: f64,
    pub complexity_score: f64,
}

/// Snapshot of the cluster a group was built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub avg_similarity: f64,
    pub cohesion: f64,
    pub member_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMetadata {
    pub cluster_info: ClusterInfo,
    /// Ids of groups folded into this one during conflict resolution.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merged_from: Vec<String>,
}

/// The unit of work for fusion: several source folders consolidated into one
/// target directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionGroup {
    pub id: String,
    pub canonical: String,
    /// Logical target below the library root, e.g. `/Bass_Music/BASS/Dubstep/Aggressive_Bass`.
    pub target_path: String,
    pub classification: GroupClassification,
    pub source_files: Vec<SourceFileMapping>,
    pub statistics: FusionStatistics,
    pub confidence: f64,
    pub metadata: GroupMetadata,
}

impl FusionGroup {
    /// Distinct pack ids contributing to this group, in first-seen order.
    pub fn pack_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for source in &self.source_files {
            if !ids.contains(&source.pack_id.as_str()) {
                ids.push(&source.pack_id);
            }
        }
        ids
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// The groups share a large fraction of their source packs.
    Overlap,
    /// The canonical names are nearly identical.
    Ambiguous,
    /// The groups resolve to the same target path.
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Merge,
    Split,
    Ignore,
    Manual,
}

/// A detected collision between two fusion groups. Transient: consumed once
/// by conflict application, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictResolution {
    pub group_id_1: String,
    pub group_id_2: String,
    pub conflict_type: ConflictType,
    pub resolution: Resolution,
    pub confidence: f64,
    pub reason: String,
}
