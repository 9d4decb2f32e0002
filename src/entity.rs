//! Entity JSON mirror
//!
//! Writes a JSON representation of identity-bearing entities into a sharded
//! directory tree below the project root, for external tooling and debugging.
//! The primary store remains the page database: every failure here is logged
//! and swallowed so it can never abort the operation that triggered it.

use crate::error::StorageError;
use crate::files::{shard_dir, FileRepository};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Anything that carries a stable identifier
pub trait Identified {
    fn id(&self) -> &str;
}

/// Sharded JSON store for identified entities
///
/// Layout: `{root}/{category}/{id[0..3]}/{id[3..6]}/{id}/{file_name}`
pub struct EntityStore {
    root: PathBuf,
    file_name: String,
    enabled: bool,
    files: Arc<dyn FileRepository>,
}

impl EntityStore {
    pub fn new(
        root: impl Into<PathBuf>,
        file_name: impl Into<String>,
        enabled: bool,
        files: Arc<dyn FileRepository>,
    ) -> Self {
        Self {
            root: root.into(),
            file_name: file_name.into(),
            enabled,
            files,
        }
    }

    /// Directory holding all entities of `category`
    pub fn category_root(&self, category: &str) -> PathBuf {
        self.root.join(category)
    }

    /// Path of the JSON file for `id`, or `None` if the ID is too short to be stored
    pub fn entity_path(&self, category: &str, id: &str) -> Option<PathBuf> {
        shard_dir(&self.category_root(category), id).map(|dir| dir.join(&self.file_name))
    }

    /// Write `entity` as JSON, replacing any previous version.
    ///
    /// Entities whose ID is blank or shorter than the shard threshold are
    /// silently skipped.
    pub fn persist<E>(&self, category: &str, entity: &E)
    where
        E: Identified + Serialize,
    {
        if !self.enabled {
            return;
        }
        let Some(path) = self.entity_path(category, entity.id()) else {
            debug!(category, id = entity.id(), "Skipping JSON persistence for short ID");
            return;
        };
        if let Err(e) = self.write_json(&path, entity) {
            warn!(category, id = entity.id(), error = %e, "Failed to persist entity as JSON");
        } else {
            debug!(category, id = entity.id(), path = %path.display(), "Persisted entity as JSON");
        }
    }

    /// Remove the JSON file for `id` and prune shard directories left empty
    pub fn delete(&self, category: &str, id: &str) {
        if !self.enabled {
            return;
        }
        let Some(path) = self.entity_path(category, id) else {
            return;
        };
        let category_root = self.category_root(category);
        if let Err(e) = self
            .files
            .delete_and_prune_empty_parents(&path, &category_root)
        {
            warn!(category, id, error = %e, "Failed to delete entity JSON");
        } else {
            debug!(category, id, "Deleted entity JSON");
        }
    }

    fn write_json<E: Serialize>(&self, path: &Path, entity: &E) -> Result<(), StorageError> {
        let parent = path
            .parent()
            .ok_or_else(|| StorageError::InvalidPath(path.display().to_string()))?;
        self.files.create_dir_if_required(parent)?;
        let json = serde_json::to_vec_pretty(entity)?;
        self.files.write(path, &json)
    }
}
