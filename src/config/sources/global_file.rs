//! User-level config file: `<config dir>/curio/config.toml`

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

/// Path of the user-level config file, if the platform has a config dir
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "curio").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add the user-level config file to `builder` if it exists
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(path) = global_config_path() {
        if path.is_file() {
            debug!(config_path = %path.display(), "Using user configuration");
            builder = builder.add_source(File::from(path).required(false));
        }
    }
    Ok(builder)
}
