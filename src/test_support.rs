//! Fixtures shared by filesystem tests.

use crate::model::{Classification, ClassifiedPack, FolderPath, TypeZone};
use std::path::{Path, PathBuf};

/// Write `content` at `root/relative`, creating parents.
pub(crate) fn write_file(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// Create a pack directory `root/name` holding `files` (relative path, content).
pub(crate) fn create_pack_tree(root: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
    let pack_root = root.join(name);
    std::fs::create_dir_all(&pack_root).unwrap();
    for (relative, content) in files {
        write_file(&pack_root, relative, content.as_bytes());
    }
    pack_root
}

/// A classified pack rooted at `root`.
pub(crate) fn classified_pack(
    id: &str,
    name: &str,
    family: &str,
    style: &str,
    root: &Path,
) -> ClassifiedPack {
    ClassifiedPack::new(id, name, Classification::new(family, style), root)
}

pub(crate) fn zone(path: &str, type_name: &str) -> TypeZone {
    TypeZone {
        path: PathBuf::from(path),
        type_name: type_name.to_string(),
    }
}

/// Sorted file paths below `root`, relative to it.
pub(crate) fn tree_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Two "Peak Time" packs whose `Kicks` and `Kick` folders should fuse, plus
/// the folders to cluster.
///
/// `a/Kicks/k1.wav` and `b/Kick/k1.wav` are identical.
pub(crate) fn kick_packs(root: &Path) -> (Vec<ClassifiedPack>, Vec<FolderPath>) {
    let a = create_pack_tree(
        root,
        "a",
        &[
            ("Kicks/k1.wav", "1"),
            ("Kicks/k2.wav", "2"),
            ("Snares/s1.wav", "s"),
        ],
    );
    let b = create_pack_tree(
        root,
        "b",
        &[("Kick/k1.wav", "1"), ("Kick/k3.wav", "3"), ("FX/rise.wav", "r")],
    );
    let packs = vec![
        classified_pack("a", "Pack A", "Techno", "Peak Time", &a),
        classified_pack("b", "Pack B", "Techno", "Peak Time", &b),
    ];
    let folders = vec![
        FolderPath::new("a", a.join("Kicks"), 2),
        FolderPath::new("b", b.join("Kick"), 2),
    ];
    (packs, folders)
}
