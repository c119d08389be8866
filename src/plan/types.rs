//! Data types for organization plans.

use super::structure::FolderStructure;
use crate::config::HierarchyTemplate;
use crate::error::{PackfuseError, Result};
use crate::fs::{atomic_write_file, path_contains_traversal};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    CreateFolder,
    MoveFile,
    CopyFile,
    /// Never planned by the engine; accepted in hand-edited plans.
    DeleteFile,
}

impl OperationKind {
    /// Whether the operation acts on a source file.
    pub fn needs_source(&self) -> bool {
        !matches!(self, OperationKind::CreateFolder)
    }

    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::CreateFolder => "create_folder",
            OperationKind::MoveFile => "move_file",
            OperationKind::CopyFile => "copy_file",
            OperationKind::DeleteFile => "delete_file",
        }
    }
}

/// One planned filesystem operation.
///
/// The planned `target` is never rewritten; conflict-resolved final targets
/// are recorded on the execution result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    pub kind: OperationKind,
    #[serde(default)]
    pub priority: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    pub target: PathBuf,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub retryable: bool,
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default)]
    pub rollbackable: bool,
    #[serde(default)]
    pub estimated_size: u64,
    #[serde(default)]
    pub estimated_duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Every file of every source lands in the target.
    #[default]
    MergeAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConflictHandling {
    /// Identical files are skipped, differing files with the same name get `_N`.
    #[default]
    RenameDuplicates,
}

/// One source folder of a fusion operation. Priority 0 is the seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionSource {
    pub pack_id: String,
    pub pack_name: String,
    pub source_path: PathBuf,
    pub priority: usize,
    pub file_count: usize,
    pub estimated_size: u64,
}

/// Consolidate several source folders into one target directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionOperation {
    pub id: String,
    pub group_id: String,
    pub canonical: String,
    pub target: PathBuf,
    pub sources: Vec<FusionSource>,
    #[serde(default)]
    pub merge_strategy: MergeStrategy,
    #[serde(default)]
    pub conflict_handling: ConflictHandling,
    pub estimated_files: usize,
    pub estimated_size: u64,
    pub estimated_duplicates: usize,
    pub estimated_rename_conflicts: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskType {
    Conflict,
    Fusion,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSeverity {
    Low,
    Medium,
    High,
}

/// Advisory risk attached to a plan. Never blocks execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRisk {
    pub risk_type: RiskType,
    pub severity: RiskSeverity,
    pub probability: f64,
    pub impact_score: f64,
    pub description: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EstimatedStats {
    pub total_operations: usize,
    pub folders_to_create: usize,
    pub files_to_move: usize,
    pub files_to_copy: usize,
    pub fusion_operations: usize,
    pub fused_files: usize,
    pub total_size: u64,
    pub estimated_duration_ms: u64,
}

/// The full, inspectable plan. Nothing touches the filesystem until it is
/// handed to the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationPlan {
    pub target_root: PathBuf,
    pub template: HierarchyTemplate,
    pub operations: Vec<Operation>,
    pub fusion_operations: Vec<FusionOperation>,
    pub folder_structure: FolderStructure,
    #[serde(default)]
    pub risks: Vec<PlanRisk>,
    pub estimated_stats: EstimatedStats,
    #[serde(default)]
    pub checkpoints: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl OrganizationPlan {
    pub fn operation(&self, id: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.id == id)
    }

    /// Check the plan's structural invariants.
    ///
    /// - operation ids are unique
    /// - file operations carry a source
    /// - dependencies name known operations
    /// - every target lies under `target_root` without `..` components
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        let mut ids = HashSet::new();
        for op in &self.operations {
            if !ids.insert(op.id.as_str()) {
                problems.push(format!("duplicate operation id '{}'", op.id));
            }
        }

        for op in &self.operations {
            if op.kind.needs_source() && op.source.is_none() {
                problems.push(format!("{} '{}' has no source", op.kind.label(), op.id));
            }

            for dep in &op.dependencies {
                if !ids.contains(dep.as_str()) {
                    problems.push(format!(
                        "operation '{}' depends on unknown operation '{}'",
                        op.id, dep
                    ));
                }
            }

            if !self.is_under_root(&op.target) {
                problems.push(format!(
                    "operation '{}' targets '{}' outside '{}'",
                    op.id,
                    op.target.display(),
                    self.target_root.display()
                ));
            }
        }

        for fusion in &self.fusion_operations {
            if !self.is_under_root(&fusion.target) {
                problems.push(format!(
                    "fusion '{}' targets '{}' outside '{}'",
                    fusion.id,
                    fusion.target.display(),
                    self.target_root.display()
                ));
            }
            if fusion.sources.is_empty() {
                problems.push(format!("fusion '{}' has no sources", fusion.id));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(PackfuseError::ValidationError(problems.join("; ")))
        }
    }

    fn is_under_root(&self, path: &Path) -> bool {
        path.starts_with(&self.target_root) && !path_contains_traversal(path)
    }

    /// Write the plan as pretty JSON with an atomic write.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            PackfuseError::ValidationError(format!("failed to serialize plan: {}", e))
        })?;
        atomic_write_file(path, &json)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        crate::model::read_json(path)
    }
}
