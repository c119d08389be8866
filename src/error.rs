//! Error types for packfuse.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Failures of individual filesystem operations during execution are not
//! raised through this type; they are collected as `ExecutionError` records
//! on the execution result (see `crate::execute`).

use crate::exit_codes;
use thiserror::Error;

/// Main error type for packfuse operations.
#[derive(Error, Debug)]
pub enum PackfuseError {
    /// User provided invalid arguments or unreadable input.
    #[error("{0}")]
    UserError(String),

    /// Configuration file could not be read, parsed, or validated.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A plan or input was rejected before execution started.
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// A filesystem operation failed.
    #[error("Filesystem operation failed: {0}")]
    FilesystemError(String),

    /// Consolidating a fusion group failed.
    #[error("Fusion failed: {0}")]
    FusionError(String),

    /// A target collision or fusion conflict was left unresolved.
    #[error("Unresolved conflict: {0}")]
    ConflictError(String),
}

impl PackfuseError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PackfuseError::UserError(_) => exit_codes::USER_ERROR,
            PackfuseError::ConfigError(_) => exit_codes::USER_ERROR,
            PackfuseError::ValidationError(_) => exit_codes::VALIDATION_FAILURE,
            PackfuseError::FilesystemError(_) => exit_codes::EXECUTION_FAILURE,
            PackfuseError::FusionError(_) => exit_codes::EXECUTION_FAILURE,
            PackfuseError::ConflictError(_) => exit_codes::CONFLICT_FAILURE,
        }
    }
}

/// Result type alias for packfuse operations.
pub type Result<T> = std::result::Result<T, PackfuseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_and_config_errors_share_exit_code() {
        let err = PackfuseError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);

        let err = PackfuseError::ConfigError("bad threshold".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn validation_error_has_correct_exit_code() {
        let err = PackfuseError::ValidationError("duplicate operation id".to_string());
        assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);
    }

    #[test]
    fn execution_errors_have_correct_exit_code() {
        let err = PackfuseError::FilesystemError("disk full".to_string());
        assert_eq!(err.exit_code(), exit_codes::EXECUTION_FAILURE);

        let err = PackfuseError::FusionError("fusion_0001".to_string());
        assert_eq!(err.exit_code(), exit_codes::EXECUTION_FAILURE);
    }

    #[test]
    fn conflict_error_has_correct_exit_code() {
        let err = PackfuseError::ConflictError("2 manual conflicts".to_string());
        assert_eq!(err.exit_code(), exit_codes::CONFLICT_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = PackfuseError::ValidationError("operation op_00001 has no source".to_string());
        assert_eq!(
            err.to_string(),
            "Validation failed: operation op_00001 has no source"
        );

        let err = PackfuseError::ConfigError("min_group_size must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: min_group_size must be > 0"
        );
    }
}
