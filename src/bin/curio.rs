//! Curio CLI Binary
//!
//! Command-line interface for the Curio draft/publish content engine.

use clap::Parser;
use curio::cli::{Cli, RunContext};
use curio::config::{ConfigLoader, CurioConfig};
use curio::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };

    let logging_config = match build_logging_config(&cli, &config) {
        Ok(logging_config) => logging_config,
        Err(e) => {
            eprintln!("{}", curio::cli::map_error(&e));
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Curio CLI starting");

    let context = match RunContext::from_config(config) {
        Ok(ctx) => {
            info!("CLI context initialized");
            ctx
        }
        Err(e) => {
            error!("Error opening project: {}", e);
            eprintln!("{}", curio::cli::map_error(&e));
            process::exit(curio::cli::exit_code(&e));
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", curio::cli::map_error(&e));
            process::exit(curio::cli::exit_code(&e));
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<CurioConfig> {
    use anyhow::Context;

    let mut config = match cli.config {
        Some(ref config_path) => ConfigLoader::load_from_file(config_path)
            .with_context(|| format!("reading {}", config_path.display()))?,
        None => ConfigLoader::load(&cli.project)
            .with_context(|| format!("loading project {}", cli.project.display()))?,
    };
    if config.project_root.is_none() {
        config.project_root = Some(cli.project.clone());
    }
    Ok(config)
}

/// Logging configuration from the config file, overridden by CLI arguments
fn build_logging_config(
    cli: &Cli,
    config: &CurioConfig,
) -> Result<LoggingConfig, curio::error::ApiError> {
    let mut logging = config.logging.clone();

    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.parse()?;
    }
    if let Some(ref output) = cli.log_output {
        logging.output = output.parse()?;
    }
    if let Some(ref file) = cli.log_file {
        logging.file = file.clone();
    } else if logging.file.is_relative() {
        logging.file = config.root().join(&logging.file);
    }

    Ok(logging)
}
