//! CLI parse: clap types for Curio. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Curio CLI - draft/publish content engine for widget pages
#[derive(Parser)]
#[command(name = "curio")]
#[command(about = "Edit, publish and serve widget-based pages with draft/publish file reconciliation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root directory
    #[arg(long, default_value = ".")]
    pub project: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Page operations (create, edit, publish, render)
    Page {
        #[command(subcommand)]
        command: PageCommands,
    },
    /// Widget file operations
    File {
        #[command(subcommand)]
        command: FileCommands,
    },
    /// Menu operations
    Menu {
        #[command(subcommand)]
        command: MenuCommands,
    },
}

#[derive(Subcommand)]
pub enum PageCommands {
    /// Create an empty page
    Create {
        /// Roles required to see the page (comma-separated)
        #[arg(long, value_delimiter = ',')]
        restrictions: Vec<String>,
    },
    /// Delete a page and all of its widget files
    Delete {
        /// Page ID or alias
        page: String,
    },
    /// Set or clear a page alias
    Alias {
        /// Page ID
        page_id: String,
        /// New alias (omit to clear)
        alias: Option<String>,
    },
    /// Show the published content as a caller sees it
    Show {
        /// Page ID or alias; omit for the index page
        page: Option<String>,
        /// Caller roles (comma-separated)
        #[arg(long, value_delimiter = ',')]
        roles: Vec<String>,
        /// Caller locale
        #[arg(long)]
        locale: Option<String>,
    },
    /// Show the draft content as a caller sees it
    ShowWip {
        /// Page ID or alias
        page: String,
        /// Caller roles (comma-separated)
        #[arg(long, value_delimiter = ',')]
        roles: Vec<String>,
        /// Caller locale
        #[arg(long)]
        locale: Option<String>,
    },
    /// Replace the draft with the content of a JSON file
    Save {
        /// Page ID or alias
        page: String,
        /// JSON file holding the page content
        file: PathBuf,
        /// Caller roles (comma-separated)
        #[arg(long, value_delimiter = ',', default_value = "ROLE_ADMIN")]
        roles: Vec<String>,
    },
    /// Publish the draft
    Publish {
        /// Page ID or alias
        page: String,
    },
    /// Discard the draft
    Reset {
        /// Page ID or alias
        page: String,
    },
    /// Show whether the draft diverges from the published content
    State {
        /// Page ID or alias
        page: String,
    },
    /// List pages
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum FileCommands {
    /// Attach a file to a draft widget
    Add {
        /// Page ID or alias
        page: String,
        /// Widget ID
        widget_id: String,
        /// File to upload
        path: PathBuf,
        /// Stored file name (defaults to the file name of `path`)
        #[arg(long)]
        name: Option<String>,
    },
    /// Remove a file from a draft widget
    Rm {
        /// Page ID or alias
        page: String,
        /// Widget ID
        widget_id: String,
        /// Stored file name
        file_name: String,
    },
    /// Read a widget file
    Get {
        /// Widget ID
        widget_id: String,
        /// Stored file name
        file_name: String,
        /// Image size (original, detail, item-card, page-title)
        #[arg(long)]
        size: Option<String>,
        /// Read from the draft directory
        #[arg(long)]
        wip: bool,
        /// Write the bytes to this path instead of reporting their length
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum MenuCommands {
    /// Replace all menus with the content of a JSON file
    Set {
        /// JSON file holding an array of menus
        file: PathBuf,
    },
    /// Show all menus
    Show,
}
