//! Configuration System
//!
//! Layered configuration built with the `config` crate. Sources in
//! increasing precedence:
//!
//! 1. Built-in defaults
//! 2. User config file (`<config dir>/curio/config.toml`)
//! 3. `<project>/config/config.toml`
//! 4. `<project>/config/{CURIO_ENV}.toml` (default env: `development`)
//! 5. Environment variables, `CURIO_` prefix with `__` as separator
//!    (`CURIO_STORAGE__WIDGETS_DIR=assets`)

mod sources;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurioConfig {
    /// Project root; relative storage paths resolve against it
    pub project_root: Option<PathBuf>,

    /// ID of the page served as the site's index page
    pub index_page_id: Option<String>,

    pub storage: StorageConfig,

    pub logging: LoggingConfig,
}

/// Storage locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of the sharded widget directories
    pub widgets_dir: PathBuf,

    /// Sled database holding pages and menus
    pub database_path: PathBuf,

    pub json_persistence: JsonPersistenceConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            widgets_dir: PathBuf::from("widgets"),
            database_path: PathBuf::from(".curio/db"),
            json_persistence: JsonPersistenceConfig::default(),
        }
    }
}

/// Denormalized JSON copies of pages for external tooling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonPersistenceConfig {
    pub enabled: bool,
    pub pages_dir: PathBuf,
    pub file_name: String,
}

impl Default for JsonPersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            pages_dir: PathBuf::from("pages"),
            file_name: "page.json".to_string(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Storage(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Storage(msg) => write!(f, "Storage: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl CurioConfig {
    /// Validate the entire configuration, collecting every problem
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let storage = &self.storage;

        if storage.widgets_dir.as_os_str().is_empty() {
            errors.push(ValidationError::Storage(
                "Widgets directory cannot be empty".to_string(),
            ));
        }
        if storage.database_path.as_os_str().is_empty() {
            errors.push(ValidationError::Storage(
                "Database path cannot be empty".to_string(),
            ));
        }
        if storage.json_persistence.enabled {
            if storage.json_persistence.pages_dir.as_os_str().is_empty() {
                errors.push(ValidationError::Storage(
                    "JSON pages directory cannot be empty".to_string(),
                ));
            }
            let file_name = storage.json_persistence.file_name.trim();
            if file_name.is_empty() || file_name.contains(['/', '\\']) {
                errors.push(ValidationError::Storage(format!(
                    "Invalid JSON file name: '{}'",
                    storage.json_persistence.file_name
                )));
            }
        }
        if self.logging.level.trim().is_empty() {
            errors.push(ValidationError::Logging("Log level cannot be empty".to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding all problems into one error
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })
    }

    /// Project root, defaulting to the current directory
    pub fn root(&self) -> PathBuf {
        self.project_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root().join(path)
        }
    }

    pub fn widgets_dir(&self) -> PathBuf {
        self.resolve(&self.storage.widgets_dir)
    }

    pub fn database_path(&self) -> PathBuf {
        self.resolve(&self.storage.database_path)
    }
}

/// Loads [`CurioConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the configuration of the project at `project_root`.
    ///
    /// `project_root` is recorded in the result unless a source sets it.
    pub fn load(project_root: &Path) -> Result<CurioConfig, ConfigError> {
        let builder = Self::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::project_file::add_to_builder(builder, project_root)?;
        let mut config: CurioConfig = builder
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;

        if config.project_root.is_none() {
            config.project_root = Some(project_root.to_path_buf());
        }
        Ok(config)
    }

    /// Load defaults plus a single explicit file (and the environment)
    pub fn load_from_file(path: &Path) -> Result<CurioConfig, ConfigError> {
        Self::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let storage = StorageConfig::default();
        Config::builder()
            .set_default("storage.widgets_dir", path_default(&storage.widgets_dir))?
            .set_default("storage.database_path", path_default(&storage.database_path))?
            .set_default("storage.json_persistence.enabled", false)?
            .set_default(
                "storage.json_persistence.pages_dir",
                path_default(&storage.json_persistence.pages_dir),
            )?
            .set_default(
                "storage.json_persistence.file_name",
                storage.json_persistence.file_name,
            )
    }

    fn environment() -> Environment {
        Environment::with_prefix("CURIO")
            .prefix_separator("_")
            .separator("__")
    }
}

fn path_default(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
