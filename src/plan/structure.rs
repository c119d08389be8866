//! Target folder tree: built flat while planning, frozen once pruned.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// A file placed in a target folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub source: PathBuf,
    pub size: u64,
}

/// Mutable planning record for one target folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderRecord {
    pub files: Vec<FileInfo>,
    pub children: BTreeSet<PathBuf>,
    /// Kept even when empty (fusion targets).
    pub reserved: bool,
}

/// One folder of the frozen tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub files: Vec<FileInfo>,
    #[serde(default)]
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// This node and all descendants, parents before children.
    pub fn walk(&self) -> Vec<&FolderNode> {
        let mut nodes = vec![self];
        let mut i = 0;
        while i < nodes.len() {
            let node = nodes[i];
            nodes.extend(node.children.iter());
            i += 1;
        }
        nodes
    }
}

/// The pruned target tree. Immutable once frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderStructure {
    pub root: FolderNode,
    pub total_folders: usize,
    pub total_files: usize,
}

impl FolderStructure {
    /// Every folder path, breadth-first so parents come before children.
    pub fn folder_paths(&self) -> Vec<&Path> {
        self.root.walk().into_iter().map(|n| n.path.as_path()).collect()
    }
}

/// Flat `path -> record` map used while planning.
#[derive(Debug, Clone)]
pub struct FolderStructureBuilder {
    root: PathBuf,
    records: BTreeMap<PathBuf, FolderRecord>,
}

impl FolderStructureBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut records = BTreeMap::new();
        records.insert(root.clone(), FolderRecord::default());
        Self { root, records }
    }

    /// Ensure `dir` and every ancestor up to the root exist as records.
    ///
    /// Paths outside the root are ignored.
    pub fn ensure(&mut self, dir: &Path) -> bool {
        if !dir.starts_with(&self.root) {
            return false;
        }

        let mut current = dir.to_path_buf();
        while current != self.root {
            self.records.entry(current.clone()).or_default();
            let Some(parent) = current.parent().map(Path::to_path_buf) else {
                break;
            };
            self.records
                .entry(parent.clone())
                .or_default()
                .children
                .insert(current);
            current = parent;
        }
        true
    }

    /// Keep `dir` in the tree even if it ends up empty.
    pub fn reserve(&mut self, dir: &Path) {
        if self.ensure(dir)
            && let Some(record) = self.records.get_mut(dir)
        {
            record.reserved = true;
        }
    }

    pub fn add_file(&mut self, dir: &Path, file: FileInfo) {
        if self.ensure(dir)
            && let Some(record) = self.records.get_mut(dir)
        {
            record.files.push(file);
        }
    }

    pub fn record(&self, dir: &Path) -> Option<&FolderRecord> {
        self.records.get(dir)
    }

    /// Remove empty, unreserved branches, deepest first. The root always stays.
    pub fn prune(&mut self) {
        let mut paths: Vec<PathBuf> = self.records.keys().cloned().collect();
        paths.sort_by_key(|p| std::cmp::Reverse(p.components().count()));

        for path in paths {
            if path == self.root {
                continue;
            }
            let removable = self
                .records
                .get(&path)
                .is_some_and(|r| !r.reserved && r.files.is_empty() && r.children.is_empty());
            if !removable {
                continue;
            }

            self.records.remove(&path);
            if let Some(parent) = path.parent()
                && let Some(record) = self.records.get_mut(parent)
            {
                record.children.remove(&path);
            }
        }
    }

    /// Prune and convert into the immutable tree.
    pub fn freeze(mut self) -> FolderStructure {
        self.prune();
        let root = self.node(&self.root);
        let total_folders = self.records.len();
        let total_files = self.records.values().map(|r| r.files.len()).sum();

        FolderStructure {
            root,
            total_folders,
            total_files,
        }
    }

    fn node(&self, path: &Path) -> FolderNode {
        let record = self.records.get(path);
        FolderNode {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string()),
            path: path.to_path_buf(),
            files: record.map(|r| r.files.clone()).unwrap_or_default(),
            children: record
                .map(|r| r.children.iter().map(|c| self.node(c)).collect())
                .unwrap_or_default(),
        }
    }
}
