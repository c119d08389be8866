//! Collision-free naming and path shape helpers.

use std::path::{Component, Path, PathBuf};

/// Return `path` if nothing exists there, otherwise the first free
/// `{stem}_{n}{.ext}` sibling, counting from 1.
///
/// `kick.wav` -> `kick_1.wav` -> `kick_2.wav` ...
pub fn unique_path(path: &Path) -> PathBuf {
    if !exists_or_dangling(path) {
        return path.to_path_buf();
    }

    let parent = path.parent().unwrap_or(Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1usize;
    loop {
        let candidate = parent.join(format!("{}_{}{}", stem, counter, extension));
        if !exists_or_dangling(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Whether anything (including a dangling symlink) occupies `path`.
fn exists_or_dangling(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Number of normal components in a path (`/a/b/c` -> 3).
pub fn path_depth(path: &Path) -> usize {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count()
}

/// Check if a path contains any ".." traversal components.
pub fn path_contains_traversal(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::ParentDir))
}
