//! Configuration model for packfuse.
//!
//! This module defines the Config struct that represents `packfuse.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for optional fields, and validation of config values.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::Config;
pub use operations::DEFAULT_CONFIG_FILE;
pub use types::{ConflictStrategy, HierarchyLevel, HierarchyTemplate, OperationMode};
