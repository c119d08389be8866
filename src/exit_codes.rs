//! Exit code constants for the packfuse CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unreadable input, bad config)
//! - 2: Validation failure (malformed plan or input)
//! - 3: Execution failure (filesystem or fusion errors, rollback ran)
//! - 4: Unresolved conflict that needs a manual decision

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unreadable inputs, or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Validation failure: the plan or its inputs were rejected before execution.
pub const VALIDATION_FAILURE: i32 = 2;

/// Execution failure: one or more filesystem or fusion operations failed.
pub const EXECUTION_FAILURE: i32 = 3;

/// Conflict failure: fusion conflicts were left for a manual decision.
pub const CONFLICT_FAILURE: i32 = 4;
