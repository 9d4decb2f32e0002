//! Identity-sharded directory layout
//!
//! Entities and widget files live under a directory derived purely from their
//! identifier: `{root}/{id[0..3]}/{id[3..6]}/{id}`. Two levels of fixed-length
//! prefixes keep the number of entries per directory bounded.

use std::path::{Path, PathBuf};

/// IDs shorter than this are not yet ready to be stored
pub const MIN_ID_LENGTH: usize = 6;

const FIRST_PREFIX: std::ops::Range<usize> = 0..3;
const SECOND_PREFIX: std::ops::Range<usize> = 3..6;

/// Compute the sharded leaf directory for `id` below `root`.
///
/// Returns `None` for IDs below [`MIN_ID_LENGTH`], IDs with surrounding
/// whitespace and IDs whose prefixes would not be valid single path components.
pub fn shard_dir(root: &Path, id: &str) -> Option<PathBuf> {
    if id.len() < MIN_ID_LENGTH || id.trim() != id || !is_plain_component(id) {
        return None;
    }
    let first = id.get(FIRST_PREFIX)?;
    let second = id.get(SECOND_PREFIX)?;
    Some(root.join(first).join(second).join(id))
}

/// Whether `id` can be placed in the sharded layout at all
pub fn is_shardable(id: &str) -> bool {
    shard_dir(Path::new(""), id).is_some()
}

/// Whether `name` can be used as a single path component
pub fn is_plain_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}
