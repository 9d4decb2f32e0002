//! Project config files: `config/config.toml`, then `config/{CURIO_ENV}.toml`

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::Path;
use tracing::debug;

pub const DEFAULT_ENV: &str = "development";

/// Add the project's config files to `builder`.
///
/// The environment-specific file overrides the base file.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    project_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let config_dir = project_root.join("config");
    let env_name = std::env::var("CURIO_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let mut builder = builder;
    for path in [
        config_dir.join("config.toml"),
        config_dir.join(format!("{}.toml", env_name)),
    ] {
        if path.is_file() {
            debug!(config_path = %path.display(), "Using project configuration");
            builder = builder.add_source(File::from(path).required(false));
        }
    }
    Ok(builder)
}
