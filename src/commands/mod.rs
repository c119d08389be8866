//! Command implementations for packfuse.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the small JSON input/output helpers they share.

mod cluster;
mod execute;
mod patterns;
mod plan;
mod similarity;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::error::{PackfuseError, Result};
use crate::fs::atomic_write_file;
use serde::Serialize;
use std::path::Path;

pub use execute::execution_options;
pub use plan::{PlanRun, build_plan};

/// Dispatch a command to its implementation.
///
/// The config is resolved once (`--config`, else `./packfuse.yaml`, else
/// defaults) and passed to every handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.config.as_deref())?;

    match cli.command {
        Command::Similarity(args) => similarity::cmd_similarity(args, &config),
        Command::Patterns(args) => patterns::cmd_patterns(args),
        Command::Cluster(args) => cluster::cmd_cluster(args, &config),
        Command::Plan(args) => plan::cmd_plan(args, &config),
        Command::Execute(args) => execute::cmd_execute(args, &config),
    }
}

/// Serialize `value` as pretty JSON.
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| PackfuseError::UserError(format!("failed to serialize output: {}", e)))
}

/// Write JSON to `output` atomically, or to stdout when no path is given.
pub(crate) fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = to_pretty_json(value)?;
    match output {
        Some(path) => atomic_write_file(path, &json),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

/// Make a path relative to `root` for display.
pub(crate) fn make_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_make_relative() {
        let root = Path::new("/library");
        let path = Path::new("/library/Bass_Music/BASS/Kicks");
        assert_eq!(make_relative(path, root), "Bass_Music/BASS/Kicks");

        let outside = Path::new("/other/path");
        assert_eq!(make_relative(outside, root), "/other/path");
    }

    #[test]
    fn test_write_json_to_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out/values.json");

        write_json(&vec![1, 2, 3], Some(path.as_path())).unwrap();

        let values: Vec<i32> = crate::model::read_json(&path).unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }
}
