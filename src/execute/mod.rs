//! Plan execution with journaled rollback.
//!
//! The executor applies an [`crate::plan::OrganizationPlan`] in three phases
//! (create folders, fuse sources, move or copy files), records a result for
//! every step, and on abort undoes what it can in reverse order.

mod executor;
mod rollback;
mod types;


pub use executor::{DISPLACED_DIR, OrganizationExecutor, ProgressCallback};
pub use types::{
    ErrorCategory, ErrorSeverity, ExecutionError, ExecutionMetrics, ExecutionOptions,
    ExecutionPhase, FileMove, FusionGroupResult, FusionResult, OperationResult,
    OrganizationResult, Progress, RollbackReport,
};
