//! Asset Lifecycle Manager
//!
//! Keeps the files on disk consistent with what widgets declare they use.
//!
//! Every widget owns a sharded directory under the widgets root holding its
//! published files, with a `wip` subdirectory holding the draft copies:
//!
//! ```text
//! widgets/abc/def/abcdef-.../a.png
//! widgets/abc/def/abcdef-.../DETAIL-a.png
//! widgets/abc/def/abcdef-.../wip/a.png
//! ```

pub mod size;

pub use size::ImageSize;

use crate::error::StorageError;
use crate::files::shard::is_plain_component;
use crate::files::{shard_dir, FileRepository};
use crate::widget::{FileOperation, Widget};
use image::imageops::FilterType;
use image::ImageFormat;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the draft subdirectory inside a widget directory
pub const WIP_DIR_NAME: &str = "wip";

/// Check that an uploaded file name is a single plain path component
pub fn validate_file_name(file_name: &str) -> Result<(), StorageError> {
    if file_name.trim().is_empty() {
        return Err(StorageError::InvalidPath(
            "No filename specified for uploaded file".to_string(),
        ));
    }
    if !is_plain_component(file_name) || file_name == WIP_DIR_NAME {
        return Err(StorageError::InvalidPath(format!(
            "Invalid file name: {}",
            file_name
        )));
    }
    Ok(())
}

/// Manages widget directories and the files inside them
pub struct AssetManager {
    widgets_root: PathBuf,
    files: Arc<dyn FileRepository>,
}

impl AssetManager {
    pub fn new(widgets_root: impl Into<PathBuf>, files: Arc<dyn FileRepository>) -> Self {
        Self {
            widgets_root: widgets_root.into(),
            files,
        }
    }

    pub fn widgets_root(&self) -> &Path {
        &self.widgets_root
    }

    pub fn files(&self) -> &Arc<dyn FileRepository> {
        &self.files
    }

    /// Directory holding a widget's published files
    pub fn widget_dir(&self, widget_id: &str) -> Result<PathBuf, StorageError> {
        shard_dir(&self.widgets_root, widget_id)
            .ok_or_else(|| StorageError::InvalidPath(format!("Invalid widget ID: {}", widget_id)))
    }

    /// Directory holding a widget's draft files
    pub fn wip_dir(&self, widget_id: &str) -> Result<PathBuf, StorageError> {
        Ok(self.widget_dir(widget_id)?.join(WIP_DIR_NAME))
    }

    /// Store an uploaded file as a draft file of `widget`.
    ///
    /// The file is referenced by the widget afterwards and files the widget
    /// no longer references are purged. Returns the stored file name.
    pub fn save_file(
        &self,
        widget: &mut Widget,
        file_name: &str,
        source: &mut dyn Read,
    ) -> Result<String, StorageError> {
        validate_file_name(file_name)?;
        let wip_dir = self.wip_dir(widget.id())?;
        self.files.create_dir_if_required(&wip_dir)?;
        let written = self.files.write_from(source, &wip_dir.join(file_name))?;
        info!(widget_id = %widget.id(), file_name, bytes = written, "Saved widget file");

        // Derivatives of a replaced file are stale
        self.delete_derivatives(&wip_dir, file_name)?;

        widget.process_file(file_name, FileOperation::Add);
        self.purge_dangling(widget)?;
        Ok(file_name.to_string())
    }

    /// Delete a draft file of `widget` with all of its scaled derivatives
    pub fn delete_file(&self, widget: &mut Widget, file_name: &str) -> Result<(), StorageError> {
        validate_file_name(file_name)?;
        let wip_dir = self.wip_dir(widget.id())?;
        self.files.delete(&wip_dir.join(file_name))?;
        self.delete_derivatives(&wip_dir, file_name)?;
        widget.process_file(file_name, FileOperation::Remove);
        info!(widget_id = %widget.id(), file_name, "Deleted widget file");
        Ok(())
    }

    fn delete_derivatives(&self, dir: &Path, file_name: &str) -> Result<(), StorageError> {
        for size in ImageSize::ALL {
            self.files.delete(&dir.join(size.scaled_name(file_name)))?;
        }
        Ok(())
    }

    /// Draft files on disk that `widget` does not reference
    pub fn dangling_files(&self, widget: &Widget) -> Result<Vec<String>, StorageError> {
        if !widget.attaches_files() {
            return Ok(Vec::new());
        }
        let used = widget.used_files();
        let on_disk = self
            .files
            .list_names_without_scaled(&self.wip_dir(widget.id())?)?;
        Ok(on_disk
            .into_iter()
            .filter(|name| !used.contains(name))
            .collect())
    }

    /// Delete dangling draft files together with their derivatives.
    ///
    /// Returns the purged file names.
    pub fn purge_dangling(&self, widget: &Widget) -> Result<Vec<String>, StorageError> {
        let dangling = self.dangling_files(widget)?;
        if dangling.is_empty() {
            return Ok(dangling);
        }
        let wip_dir = self.wip_dir(widget.id())?;
        for file_name in &dangling {
            self.files.delete(&wip_dir.join(file_name))?;
            self.delete_derivatives(&wip_dir, file_name)?;
        }
        debug!(widget_id = %widget.id(), purged = ?dangling, "Purged dangling widget files");
        Ok(dangling)
    }

    /// Read a widget file, producing the scaled derivative on first request
    pub fn load_file(
        &self,
        widget_id: &str,
        file_name: &str,
        size: Option<ImageSize>,
        wip: bool,
    ) -> Result<Vec<u8>, StorageError> {
        validate_file_name(file_name)?;
        let dir = if wip {
            self.wip_dir(widget_id)?
        } else {
            self.widget_dir(widget_id)?
        };
        let original = dir.join(file_name);
        if !self.files.exists(&original) {
            return Err(StorageError::FileNotFound(original));
        }

        let Some((size, width)) = size.and_then(|s| s.width().map(|w| (s, w))) else {
            return self.files.read_bytes(&original);
        };

        let scaled = dir.join(size.scaled_name(file_name));
        if !self.files.exists(&scaled) {
            self.scale(&original, &scaled, width)?;
        }
        self.files.read_bytes(&scaled)
    }

    fn scale(&self, original: &Path, scaled: &Path, width: u32) -> Result<(), StorageError> {
        let bytes = self.files.read_bytes(original)?;
        let format = match ImageFormat::from_path(original) {
            Ok(format) => format,
            Err(_) => image::guess_format(&bytes).map_err(|e| StorageError::Image(e.to_string()))?,
        };
        let image = image::load_from_memory_with_format(&bytes, format)
            .map_err(|e| StorageError::Image(format!("{}: {}", original.display(), e)))?;

        // Images narrower than the target are stored unscaled
        let image = if image.width() > width {
            image.resize(width, u32::MAX, FilterType::Lanczos3)
        } else {
            image
        };

        let mut encoded = Cursor::new(Vec::new());
        image
            .write_to(&mut encoded, format)
            .map_err(|e| StorageError::Image(format!("{}: {}", scaled.display(), e)))?;
        self.files.write(scaled, encoded.get_ref())?;
        debug!(path = %scaled.display(), width, "Created scaled image");
        Ok(())
    }

    /// Remove a widget's directory entirely, published and draft files alike
    pub fn delete_widget_dir(&self, widget_id: &str) -> Result<(), StorageError> {
        let dir = self.widget_dir(widget_id)?;
        self.files
            .delete_and_prune_empty_parents(&dir, &self.widgets_root)
    }

    /// Whether the widget has published files but no draft directory yet
    pub fn needs_wip_initialization(&self, widget_id: &str) -> Result<bool, StorageError> {
        let dir = self.widget_dir(widget_id)?;
        Ok(self.files.is_dir(&dir) && !self.files.exists(&dir.join(WIP_DIR_NAME)))
    }

    /// Seed the draft directory from the published files if it does not exist.
    ///
    /// Returns whether the directory was created.
    pub fn initialize_wip(&self, widget_id: &str) -> Result<bool, StorageError> {
        if !self.needs_wip_initialization(widget_id)? {
            return Ok(false);
        }
        let dir = self.widget_dir(widget_id)?;
        let wip_dir = dir.join(WIP_DIR_NAME);
        self.files.create_dir_if_required(&wip_dir)?;
        for entry in self.published_entries(&dir)? {
            if let Some(name) = entry.file_name() {
                self.files.copy(&entry, &wip_dir.join(name))?;
            }
        }
        debug!(widget_id, "Initialized WIP directory");
        Ok(true)
    }

    /// Drop the draft copies but keep an empty draft directory as a marker
    /// so lazy initialization does not reseed it from the published files.
    pub fn clean_wip(&self, widget_id: &str) -> Result<(), StorageError> {
        let wip_dir = self.wip_dir(widget_id)?;
        if self.files.exists(&wip_dir) {
            self.files.delete(&wip_dir)?;
            self.files.create_dir_if_required(&wip_dir)?;
        }
        Ok(())
    }

    /// Rebuild the draft directory from the files the published widget uses
    pub fn reseed_wip(&self, published: &Widget) -> Result<(), StorageError> {
        let dir = self.widget_dir(published.id())?;
        let wip_dir = dir.join(WIP_DIR_NAME);
        self.files.delete(&wip_dir)?;
        if published.attaches_files() {
            self.files.create_dir_if_required(&wip_dir)?;
            for file_name in published.used_files() {
                self.files.copy(&dir.join(&file_name), &wip_dir.join(&file_name))?;
            }
        }
        Ok(())
    }

    /// Replace the published files with the draft files.
    ///
    /// A widget without a draft directory keeps its published files.
    pub fn promote_wip(&self, widget_id: &str) -> Result<(), StorageError> {
        let dir = self.widget_dir(widget_id)?;
        let wip_dir = dir.join(WIP_DIR_NAME);
        if !self.files.is_dir(&wip_dir) {
            return Ok(());
        }
        for entry in self.published_entries(&dir)? {
            self.files.delete(&entry)?;
        }
        for entry in self.files.list(&wip_dir)? {
            if let Some(name) = entry.file_name() {
                self.files.copy(&entry, &dir.join(name))?;
            }
        }
        Ok(())
    }

    fn published_entries(&self, dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
        Ok(self
            .files
            .list(dir)?
            .into_iter()
            .filter(|entry| entry.file_name().and_then(|n| n.to_str()) != Some(WIP_DIR_NAME))
            .collect())
    }
}
