//! CLI command-name contract for logging spans.

use crate::cli::parse::{Commands, FileCommands, MenuCommands, PageCommands};

/// Command name string for logs (e.g. "page.publish", "file.add").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Page { command } => format!("page.{}", page_command_name(command)),
        Commands::File { command } => format!("file.{}", file_command_name(command)),
        Commands::Menu { command } => format!("menu.{}", menu_command_name(command)),
    }
}

pub fn page_command_name(command: &PageCommands) -> &'static str {
    match command {
        PageCommands::Create { .. } => "create",
        PageCommands::Delete { .. } => "delete",
        PageCommands::Alias { .. } => "alias",
        PageCommands::Show { .. } => "show",
        PageCommands::ShowWip { .. } => "show_wip",
        PageCommands::Save { .. } => "save",
        PageCommands::Publish { .. } => "publish",
        PageCommands::Reset { .. } => "reset",
        PageCommands::State { .. } => "state",
        PageCommands::List { .. } => "list",
    }
}

pub fn file_command_name(command: &FileCommands) -> &'static str {
    match command {
        FileCommands::Add { .. } => "add",
        FileCommands::Rm { .. } => "rm",
        FileCommands::Get { .. } => "get",
    }
}

pub fn menu_command_name(command: &MenuCommands) -> &'static str {
    match command {
        MenuCommands::Set { .. } => "set",
        MenuCommands::Show => "show",
    }
}
