//! Menus and the restrictions they impose on their target pages

use crate::types::{PageId, RoleSet};
use serde::{Deserialize, Serialize};

/// A top-level menu or one of its entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Menu {
    pub id: String,
    pub target_page_id: Option<PageId>,
    pub restrictions: RoleSet,
    pub menu_entries: Vec<Menu>,
}

impl Menu {
    pub fn targets(&self, page_id: &str) -> bool {
        self.target_page_id.as_deref() == Some(page_id)
    }
}

/// Effective restrictions for `page_id`.
///
/// An entry without restrictions of its own inherits those of its parent
/// menu. Pages no menu points to are unrestricted.
pub fn find_restrictions(menus: &[Menu], page_id: &str) -> RoleSet {
    for menu in menus {
        if menu.targets(page_id) {
            return menu.restrictions.clone();
        }
        if let Some(entry) = menu.menu_entries.iter().find(|e| e.targets(page_id)) {
            if entry.restrictions.is_empty() {
                return menu.restrictions.clone();
            }
            return entry.restrictions.clone();
        }
    }
    RoleSet::new()
}
