//! Filesystem utilities for packfuse.
//!
//! Atomic writes for plan files, cross-device-safe moves, collision-free
//! naming, and filtered recursive enumeration of pack contents.

pub mod atomic;
mod move_file;
mod naming;
mod walk;

pub use atomic::{atomic_write, atomic_write_file};
pub use move_file::{copy_file, move_file};
pub use naming::{path_contains_traversal, path_depth, unique_path};
pub use walk::{FileFilter, WalkedFile, list_files};
