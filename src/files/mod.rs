//! File repository capability
//!
//! The reconciler and the asset manager only talk to the filesystem through
//! [`FileRepository`], so the directory semantics they rely on (recursive
//! delete, pruning of empty parents, deterministic listings) are defined in
//! one place.

pub mod filesystem;
pub mod shard;

pub use filesystem::FilesystemRepository;
pub use shard::{is_shardable, shard_dir, MIN_ID_LENGTH};

use crate::error::StorageError;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Filesystem operations consumed by the content engine
pub trait FileRepository: Send + Sync {
    /// Create `dir` and all of its parents if it does not exist yet
    fn create_dir_if_required(&self, dir: &Path) -> Result<(), StorageError>;

    /// List the direct children of `dir`, sorted by file name.
    ///
    /// A missing directory lists as empty.
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>, StorageError>;

    /// Names of the regular files in `dir` that are not scaled derivatives
    fn list_names_without_scaled(&self, dir: &Path) -> Result<Vec<String>, StorageError>;

    /// Copy a file or a whole directory tree, replacing existing targets.
    ///
    /// Copying a missing source is a no-op.
    fn copy(&self, source: &Path, target: &Path) -> Result<(), StorageError>;

    /// Stream `source` into the file at `target`, replacing it
    fn write_from(&self, source: &mut dyn Read, target: &Path) -> Result<u64, StorageError>;

    /// Write `bytes` into the file at `target`, replacing it
    fn write(&self, target: &Path, bytes: &[u8]) -> Result<(), StorageError>;

    /// Read the whole file at `path`
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, StorageError>;

    /// Delete a file or a directory tree. Deleting a missing path is a no-op.
    fn delete(&self, path: &Path) -> Result<(), StorageError>;

    /// Delete `path`, then remove each now-empty parent directory up to but
    /// excluding `stop_at`.
    ///
    /// Stops at the first parent that still has entries.
    fn delete_and_prune_empty_parents(&self, path: &Path, stop_at: &Path)
        -> Result<(), StorageError>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;
}
