//! CLI route: single route table and run context. Dispatches to the page API and presentation.

use crate::api::PageApi;
use crate::assets::ImageSize;
use crate::config::{ConfigLoader, CurioConfig};
use crate::error::{ApiError, StorageError};
use crate::page::{Menu, PageContent};
use crate::types::{roles, CallerContext};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info_span};

use crate::cli::command_name;
use crate::cli::parse::{Commands, FileCommands, MenuCommands, PageCommands};
use crate::cli::presentation::{format_json, format_page_list};

/// Runtime context for CLI execution: project root, configuration and the page API.
/// Built from the project path and optional config path using ConfigLoader only.
pub struct RunContext {
    api: PageApi,
    config: CurioConfig,
}

impl RunContext {
    /// Create run context from project root and optional config path.
    pub fn new(project_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let mut config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&project_root)?
        };
        if config.project_root.is_none() {
            config.project_root = Some(project_root);
        }
        Self::from_config(config)
    }

    /// Create run context from an already loaded configuration.
    pub fn from_config(config: CurioConfig) -> Result<Self, ApiError> {
        let api = PageApi::open(&config)?;
        Ok(Self { api, config })
    }

    /// Reference to the underlying page API.
    pub fn api(&self) -> &PageApi {
        &self.api
    }

    pub fn config(&self) -> &CurioConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let name = command_name(command);
        let _span = info_span!("command", name = %name).entered();
        let started = Instant::now();
        let result = match command {
            Commands::Page { command } => self.handle_page_command(command),
            Commands::File { command } => self.handle_file_command(command),
            Commands::Menu { command } => self.handle_menu_command(command),
        };
        debug!(
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn handle_page_command(&self, command: &PageCommands) -> Result<String, ApiError> {
        match command {
            PageCommands::Create { restrictions } => {
                let page = self.api.create_page(roles(restrictions.iter().cloned()))?;
                format_json(&page)
            }
            PageCommands::Delete { page } => {
                self.api.delete_page(page)?;
                Ok(format!("Deleted page {}", page))
            }
            PageCommands::Alias { page_id, alias } => {
                let page = self.api.update_page_alias(page_id, alias.as_deref())?;
                format_json(&json!({ "id": page.id, "alias": page.alias }))
            }
            PageCommands::Show {
                page,
                roles: caller_roles,
                locale,
            } => {
                let caller = caller_context(caller_roles, locale.as_deref());
                let page = match page {
                    Some(page) => page.clone(),
                    None => self
                        .api
                        .load_index_page()?
                        .map(|index| index.id)
                        .ok_or_else(|| ApiError::NotFound("No index page configured".to_string()))?,
                };
                format_json(&self.api.load_content(&page, &caller)?)
            }
            PageCommands::ShowWip {
                page,
                roles: caller_roles,
                locale,
            } => {
                let caller = caller_context(caller_roles, locale.as_deref());
                format_json(&self.api.load_wip_content(page, &caller)?)
            }
            PageCommands::Save {
                page,
                file,
                roles: caller_roles,
            } => {
                let edit: PageContent = read_json(file)?;
                let caller = caller_context(caller_roles, None);
                format_json(&self.api.save_content(page, &caller, edit)?)
            }
            PageCommands::Publish { page } => format_json(&self.api.publish_wip_content(page)?),
            PageCommands::Reset { page } => format_json(&self.api.reset_wip_content(page)?),
            PageCommands::State { page } => Ok(self.api.page_state(page)?.to_string()),
            PageCommands::List { format } => format_page_list(&self.api.list_pages()?, format),
        }
    }

    fn handle_file_command(&self, command: &FileCommands) -> Result<String, ApiError> {
        match command {
            FileCommands::Add {
                page,
                widget_id,
                path,
                name,
            } => {
                let file_name = match name {
                    Some(name) => name.clone(),
                    None => file_name_of(path)?,
                };
                let mut source =
                    fs::File::open(path).map_err(|e| StorageError::io(path.clone(), e))?;
                let page_id = self.api.find_page(page)?.id;
                let stored = self
                    .api
                    .save_widget_file(&page_id, widget_id, &file_name, &mut source)?;
                Ok(stored)
            }
            FileCommands::Rm {
                page,
                widget_id,
                file_name,
            } => {
                let page_id = self.api.find_page(page)?.id;
                format_json(&self.api.delete_widget_file(&page_id, widget_id, file_name)?)
            }
            FileCommands::Get {
                widget_id,
                file_name,
                size,
                wip,
                output,
            } => {
                let size = size
                    .as_deref()
                    .map(str::parse::<ImageSize>)
                    .transpose()
                    .map_err(ApiError::InvalidRequest)?;
                let bytes = self.api.load_widget_file(widget_id, file_name, size, *wip)?;
                match output {
                    Some(path) => {
                        fs::write(path, &bytes).map_err(|e| StorageError::io(path.clone(), e))?;
                        Ok(format!("Wrote {} bytes to {}", bytes.len(), path.display()))
                    }
                    None => Ok(format!("{} bytes", bytes.len())),
                }
            }
        }
    }

    fn handle_menu_command(&self, command: &MenuCommands) -> Result<String, ApiError> {
        match command {
            MenuCommands::Set { file } => {
                let menus: Vec<Menu> = read_json(file)?;
                self.api.save_menus(&menus)?;
                Ok(format!("Saved {} menus", menus.len()))
            }
            MenuCommands::Show => format_json(&self.api.load_menus()?),
        }
    }
}

fn caller_context(caller_roles: &[String], locale: Option<&str>) -> CallerContext {
    let caller = CallerContext::with_roles(
        caller_roles
            .iter()
            .map(|role| role.trim())
            .filter(|role| !role.is_empty())
            .map(str::to_string),
    );
    match locale {
        Some(locale) => caller.in_locale(locale),
        None => caller,
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ApiError> {
    let raw = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|e| {
        ApiError::InvalidRequest(format!("Invalid JSON in {}: {}", path.display(), e))
    })
}

fn file_name_of(path: &Path) -> Result<String, ApiError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ApiError::InvalidRequest(format!("No file name in {}", path.display())))
}
