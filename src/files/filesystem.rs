//! [`FileRepository`] backed by the operating system's filesystem.

use crate::assets::ImageSize;
use crate::error::StorageError;
use crate::files::FileRepository;
use std::fs;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Filesystem implementation of the file repository
#[derive(Debug, Default, Clone)]
pub struct FilesystemRepository;

impl FilesystemRepository {
    pub fn new() -> Self {
        Self
    }

    fn copy_tree(&self, source: &Path, target: &Path) -> Result<(), StorageError> {
        for entry in WalkDir::new(source).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                StorageError::io(
                    source,
                    e.into_io_error()
                        .unwrap_or_else(|| std::io::Error::new(ErrorKind::Other, "walk failed")),
                )
            })?;
            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|_| StorageError::InvalidPath(entry.path().display().to_string()))?;
            let destination = target.join(relative);
            if entry.file_type().is_dir() {
                self.create_dir_if_required(&destination)?;
            } else {
                fs::copy(entry.path(), &destination)
                    .map_err(|e| StorageError::io(&destination, e))?;
            }
        }
        Ok(())
    }
}

impl FileRepository for FilesystemRepository {
    fn create_dir_if_required(&self, dir: &Path) -> Result<(), StorageError> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
        }
        Ok(())
    }

    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            match entry {
                Ok(entry) => entries.push(entry.into_path()),
                // Concurrently removed entries are simply not listed
                Err(e) if e.io_error().map(|io| io.kind()) == Some(ErrorKind::NotFound) => {}
                Err(e) => {
                    return Err(StorageError::io(
                        dir,
                        e.into_io_error().unwrap_or_else(|| {
                            std::io::Error::new(ErrorKind::Other, "directory walk failed")
                        }),
                    ))
                }
            }
        }
        Ok(entries)
    }

    fn list_names_without_scaled(&self, dir: &Path) -> Result<Vec<String>, StorageError> {
        Ok(self
            .list(dir)?
            .into_iter()
            .filter(|path| path.is_file())
            .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(String::from))
            .filter(|name| !ImageSize::is_scaled_name(name))
            .collect())
    }

    fn copy(&self, source: &Path, target: &Path) -> Result<(), StorageError> {
        if source.is_dir() {
            self.copy_tree(source, target)
        } else if source.exists() {
            fs::copy(source, target).map_err(|e| StorageError::io(target, e))?;
            trace!(source = %source.display(), target = %target.display(), "Copied file");
            Ok(())
        } else {
            Ok(())
        }
    }

    fn write_from(&self, source: &mut dyn Read, target: &Path) -> Result<u64, StorageError> {
        let mut file = fs::File::create(target).map_err(|e| StorageError::io(target, e))?;
        std::io::copy(source, &mut file).map_err(|e| StorageError::io(target, e))
    }

    fn write(&self, target: &Path, bytes: &[u8]) -> Result<(), StorageError> {
        fs::write(target, bytes).map_err(|e| StorageError::io(target, e))
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        fs::read(path).map_err(|e| StorageError::io(path, e))
    }

    fn delete(&self, path: &Path) -> Result<(), StorageError> {
        let result = if path.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn delete_and_prune_empty_parents(
        &self,
        path: &Path,
        stop_at: &Path,
    ) -> Result<(), StorageError> {
        self.delete(path)?;

        let mut current = path.parent();
        while let Some(dir) = current {
            if dir == stop_at || !dir.starts_with(stop_at) {
                break;
            }
            if dir.exists() {
                let has_entries = fs::read_dir(dir)
                    .map_err(|e| StorageError::io(dir, e))?
                    .next()
                    .is_some();
                if has_entries {
                    break;
                }
                match fs::remove_dir(dir) {
                    Ok(()) => debug!(dir = %dir.display(), "Pruned empty directory"),
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    // A sibling was created in the meantime; keep the directory
                    Err(_) if dir.read_dir().map(|mut d| d.next().is_some()).unwrap_or(false) => {
                        break
                    }
                    Err(e) => return Err(StorageError::io(dir, e)),
                }
            }
            current = dir.parent();
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
