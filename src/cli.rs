//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the page API.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{exit_code, map_error};
pub use parse::{Cli, Commands, FileCommands, MenuCommands, PageCommands};
pub use presentation::{format_json, format_page_list};
pub use route::RunContext;
