//! Data types for plan execution.

use crate::config::{Config, ConflictStrategy};
use crate::plan::OperationKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPhase {
    #[default]
    Idle,
    CreatingFolders,
    FusingSources,
    MovingFiles,
    Finalized,
    RollingBack,
}

impl std::fmt::Display for ExecutionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ExecutionPhase::Idle => "idle",
            ExecutionPhase::CreatingFolders => "creating_folders",
            ExecutionPhase::FusingSources => "fusing_sources",
            ExecutionPhase::MovingFiles => "moving_files",
            ExecutionPhase::Finalized => "finalized",
            ExecutionPhase::RollingBack => "rolling_back",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOptions {
    pub conflict_strategy: ConflictStrategy,
    pub enable_rollback: bool,
    /// Error count that aborts the remaining plan: reaching it is enough.
    /// A failed fusion group counts as one error.
    pub critical_error_threshold: usize,
    pub capture_fusion_backup: bool,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ExecutionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            conflict_strategy: config.conflict_resolution,
            enable_rollback: config.enable_rollback,
            critical_error_threshold: config.critical_error_threshold,
            capture_fusion_backup: config.capture_fusion_backup,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Filesystem,
    Fusion,
    Conflict,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    Warning,
    Error,
    Critical,
}

/// A failure recorded during execution. Execution continues unless the
/// error is critical or the error threshold is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionError {
    pub category: ErrorCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub message: String,
    pub severity: ErrorSeverity,
    pub recoverable: bool,
    #[serde(default)]
    pub retry_count: u32,
}

impl ExecutionError {
    pub fn new(category: ErrorCategory, severity: ErrorSeverity, message: impl Into<String>) -> Self {
        Self {
            category,
            operation_id: None,
            path: None,
            message: message.into(),
            severity,
            recoverable: severity != ErrorSeverity::Critical,
            retry_count: 0,
        }
    }

    pub fn for_operation(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    pub fn at(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn unrecoverable(mut self) -> Self {
        self.recoverable = false;
        self
    }

    /// Counts towards the abort threshold.
    pub fn is_error(&self) -> bool {
        self.severity >= ErrorSeverity::Error
    }
}

/// Outcome of one planned operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub operation_id: String,
    pub kind: OperationKind,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Final target after conflict resolution.
    pub target: PathBuf,
    #[serde(default)]
    pub skipped: bool,
    /// The folder existed before this run.
    #[serde(default)]
    pub pre_existing: bool,
    /// Where an overwritten target was parked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displaced: Option<PathBuf>,
}

/// One file relocated by fusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMove {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionGroupResult {
    pub fusion_id: String,
    pub group_id: String,
    pub target: PathBuf,
    pub success: bool,
    /// The target directory did not exist before fusion.
    pub target_created: bool,
    pub files_moved: usize,
    pub duplicates_skipped: usize,
    pub conflicts_renamed: usize,
    pub bytes_moved: u64,
    /// Per-file moves, when backup capture is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<Vec<FileMove>>,
    /// Sub-folders of the target created while fusing, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub created_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FusionResult {
    /// True iff no group failed.
    pub success: bool,
    pub groups_processed: usize,
    pub groups_failed: usize,
    pub files_moved: usize,
    pub duplicates_skipped: usize,
    pub conflicts_renamed: usize,
    pub groups: Vec<FusionGroupResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionMetrics {
    pub operations_total: usize,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub folders_created: usize,
    pub files_moved: usize,
    pub files_copied: usize,
    pub files_deleted: usize,
    pub bytes_processed: u64,
    pub checkpoints_reached: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RollbackReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Steps left alone on purpose, e.g. non-empty folders.
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    /// Operations that cannot be undone.
    #[serde(default)]
    pub irreversible: Vec<String>,
}

impl RollbackReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.irreversible.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationResult {
    pub success: bool,
    pub final_phase: ExecutionPhase,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub metrics: ExecutionMetrics,
    pub fusion: FusionResult,
    /// Per-operation results in execution order.
    pub results: Vec<OperationResult>,
    pub errors: Vec<ExecutionError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollback: Option<RollbackReport>,
}

impl OrganizationResult {
    pub fn result(&self, operation_id: &str) -> Option<&OperationResult> {
        self.results.iter().find(|r| r.operation_id == operation_id)
    }
}

/// Progress notification passed to the callback.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub phase: ExecutionPhase,
    /// Monotonic, 0.0 to 100.0.
    pub percent: f64,
    pub message: String,
}
