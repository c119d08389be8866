//! Organization planning.
//!
//! Turns classified packs and fusion groups into an [`OrganizationPlan`]: a
//! list of fusion operations, folder creations and file moves/copies onto a
//! target hierarchy, plus the pruned target tree, advisory risks and
//! checkpoints. Planning reads the source trees but never writes.

mod planner;
mod risk;
mod structure;
mod types;


pub use planner::{
    DEFAULT_FUNCTION, OrganizationPlanner, PlannerOptions, QUARANTINE_DIR, checkpoint_ids,
};
pub use risk::{LARGE_PLAN_BYTES, MAX_SAFE_FUSION_SOURCES, assess_risks};
pub use structure::{FileInfo, FolderNode, FolderRecord, FolderStructure, FolderStructureBuilder};
pub use types::{
    ConflictHandling, EstimatedStats, FusionOperation, FusionSource, MergeStrategy, Operation,
    OperationKind, OrganizationPlan, PlanRisk, RiskSeverity, RiskType,
};
