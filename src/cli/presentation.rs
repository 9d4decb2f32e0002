//! CLI presentation: text and json formatters per command family.

use crate::api::PageSummary;
use crate::error::{ApiError, StorageError};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use serde::Serialize;

/// Pretty JSON for any serializable result
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::StorageError(StorageError::Serialization(e.to_string())))
}

/// Page list as a table, or as JSON when `format` is "json"
pub fn format_page_list(pages: &[PageSummary], format: &str) -> Result<String, ApiError> {
    if format == "json" {
        return format_json(pages);
    }
    if pages.is_empty() {
        return Ok("No pages.".to_string());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Alias", "Version", "State", "Widgets", "Draft Widgets"]);
    for page in pages {
        table.add_row(vec![
            page.id.clone(),
            page.alias.clone().unwrap_or_else(|| "-".to_string()),
            page.version.to_string(),
            page.state.to_string(),
            page.widgets.to_string(),
            page.wip_widgets.to_string(),
        ]);
    }
    Ok(table.to_string())
}
