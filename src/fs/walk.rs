//! Recursive file enumeration with ignore globs.

use crate::error::{PackfuseError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A regular file found under a walked root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// Absolute (or root-joined) path of the file.
    pub path: PathBuf,
    /// Path relative to the walked root.
    pub relative: PathBuf,
    /// Size in bytes (0 if metadata could not be read).
    pub size: u64,
}

/// File-name filter built from ignore globs.
#[derive(Debug, Clone)]
pub struct FileFilter {
    ignored: GlobSet,
}

impl FileFilter {
    /// Compile ignore globs. Patterns are matched against the file name only.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                PackfuseError::ConfigError(format!("invalid ignore pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }

        let ignored = builder.build().map_err(|e| {
            PackfuseError::ConfigError(format!("failed to build ignore patterns: {}", e))
        })?;

        Ok(Self { ignored })
    }

    /// A filter that accepts every file.
    pub fn allow_all() -> Self {
        Self {
            ignored: GlobSet::empty(),
        }
    }

    /// Whether a file is pack content.
    pub fn accepts(&self, path: &Path) -> bool {
        match path.file_name() {
            Some(name) => !self.ignored.is_match(Path::new(name)),
            None => false,
        }
    }
}

/// List every accepted regular file below `root`, sorted by path.
pub fn list_files(root: &Path, filter: &FileFilter) -> Result<Vec<WalkedFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            PackfuseError::FilesystemError(format!(
                "failed to walk '{}': {}",
                root.display(),
                e
            ))
        })?;

        if !entry.file_type().is_file() || !filter.accepts(entry.path()) {
            continue;
        }

        let path = entry.path().to_path_buf();
        let relative = path
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.clone());
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

        files.push(WalkedFile {
            path,
            relative,
            size,
        });
    }

    Ok(files)
}
