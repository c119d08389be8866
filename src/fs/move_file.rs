//! File move and copy helpers.
//!
//! Sample libraries routinely span volumes (an external drive of vendor packs
//! organized into a library on the system disk), so a plain `rename(2)` can
//! fail with `EXDEV` ("Invalid cross-device link"). In that case the file is
//! streamed to the destination, synced, and only then removed from the source.

use crate::error::{PackfuseError, Result};
use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Move a single file from `source` to `destination`.
///
/// - Creates the destination's parent directories.
/// - Tries `rename()` first (atomic when possible).
/// - Falls back to copy + fsync + delete of `source` on EXDEV.
///
/// An existing destination is replaced; callers resolve collisions first.
pub fn move_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Result<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    ensure_parent(destination)?;

    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_rename(&e) => move_file_cross_device(source, destination, e),
        Err(e) => Err(PackfuseError::FilesystemError(format!(
            "failed to move file '{}' to '{}': {}",
            source.display(),
            destination.display(),
            e
        ))),
    }
}

/// Copy a single file from `source` to `destination`, creating parent directories.
///
/// Returns the number of bytes copied.
pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Result<u64> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    ensure_parent(destination)?;

    fs::copy(source, destination).map_err(|e| {
        PackfuseError::FilesystemError(format!(
            "failed to copy file '{}' to '{}': {}",
            source.display(),
            destination.display(),
            e
        ))
    })
}

fn ensure_parent(destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| {
            PackfuseError::FilesystemError(format!(
                "failed to create destination directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }
    Ok(())
}

fn move_file_cross_device(
    source: &Path,
    destination: &Path,
    original_error: io::Error,
) -> Result<()> {
    fs::copy(source, destination).map_err(|e| {
        PackfuseError::FilesystemError(format!(
            "failed to copy '{}' for cross-device move: {} (original rename error: {})",
            source.display(),
            e,
            original_error
        ))
    })?;

    // The source is only deleted once the copy is durable.
    if let Ok(file) = File::open(destination) {
        let _ = file.sync_all();
    }

    fs::remove_file(source).map_err(|e| {
        PackfuseError::FilesystemError(format!(
            "moved file across devices but failed to delete source file '{}': {}",
            source.display(),
            e
        ))
    })?;

    Ok(())
}

fn is_cross_device_rename(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::CrossesDevices || err.raw_os_error() == Some(18)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn move_file_moves_file_and_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let source_dir = temp.path().join("Vendor Pack/Kicks");
        std::fs::create_dir_all(&source_dir).unwrap();

        let source = source_dir.join("kick_01.wav");
        std::fs::write(&source, b"RIFF").unwrap();

        let destination = temp.path().join("Library/House/KICK/kick_01.wav");
        move_file(&source, &destination).unwrap();

        assert!(!source.exists());
        assert_eq!(std::fs::read(&destination).unwrap(), b"RIFF");
    }

    #[test]
    fn move_file_replaces_existing_destination_file() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("new.wav");
        let destination = temp.path().join("old.wav");

        std::fs::write(&source, b"new").unwrap();
        std::fs::write(&destination, b"old").unwrap();

        move_file(&source, &destination).unwrap();

        assert!(!source.exists());
        assert_eq!(std::fs::read(&destination).unwrap(), b"new");
    }

    #[test]
    fn move_file_missing_source_is_filesystem_error() {
        let temp = TempDir::new().unwrap();
        let err = move_file(temp.path().join("ghost.wav"), temp.path().join("out.wav"))
            .unwrap_err();

        assert!(matches!(err, PackfuseError::FilesystemError(_)));
    }

    #[test]
    fn copy_file_keeps_source() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("loop.wav");
        std::fs::write(&source, b"1234").unwrap();

        let destination = temp.path().join("copies/loop.wav");
        let bytes = copy_file(&source, &destination).unwrap();

        assert_eq!(bytes, 4);
        assert!(source.exists());
        assert_eq!(std::fs::read(&destination).unwrap(), b"1234");
    }
}
