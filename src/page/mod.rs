//! Page model
//!
//! A page holds two versions of its content: the published one served to
//! visitors and the work-in-progress draft that editors change. Both share
//! the page's ID.

pub mod menu;
pub mod persistence;

pub use menu::Menu;
pub use persistence::{SledMenuRepository, SledPageRepository};

use crate::entity::Identified;
use crate::error::StorageError;
use crate::types::{PageId, RoleSet, ROLE_ADMIN, ROLE_USER};
use crate::visibility::{forbidden_for, Visible};
use crate::widget::{deserialize_widgets, Widget};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;

/// One version of a page's content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageContent {
    pub id: PageId,
    /// Effective restrictions, derived from the menu entry targeting the page
    pub restrictions: RoleSet,
    /// Whether the requesting caller may edit this content (computed per request)
    pub editable: bool,
    #[serde(deserialize_with = "deserialize_widgets")]
    pub widgets: Vec<Widget>,
}

impl PageContent {
    pub fn empty(id: impl Into<PageId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Widget IDs in page order
    pub fn widget_ids(&self) -> Vec<String> {
        self.widgets.iter().map(|w| w.id().to_string()).collect()
    }

    pub fn widget_id_set(&self) -> BTreeSet<String> {
        self.widgets.iter().map(|w| w.id().to_string()).collect()
    }

    pub fn widget(&self, widget_id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id() == widget_id)
    }

    pub fn widget_mut(&mut self, widget_id: &str) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| w.id() == widget_id)
    }

    /// Whether a caller holding `roles` may edit this content.
    ///
    /// Admin-restricted widgets require `ROLE_ADMIN`, user-restricted widgets
    /// require `ROLE_USER`; both requirements must hold independently.
    pub fn is_editable_by(&self, roles: &RoleSet) -> bool {
        let required = |role: &str| self.widgets.iter().any(|w| w.restrictions().contains(role));
        let admin_met = !required(ROLE_ADMIN) || roles.contains(ROLE_ADMIN);
        let user_met = !required(ROLE_USER) || roles.contains(ROLE_USER);
        admin_met && user_met
    }

    pub fn compute_editable(&mut self, roles: &RoleSet) {
        self.editable = self.is_editable_by(roles);
    }

    /// Copy without the per-request attributes, as written to storage
    pub fn for_storage(&self) -> PageContent {
        PageContent {
            restrictions: RoleSet::new(),
            editable: false,
            ..self.clone()
        }
    }

    /// Content equality ignoring per-request attributes
    pub fn same_content(&self, other: &PageContent) -> bool {
        self.id == other.id && self.widgets == other.widgets
    }

    /// Deep copy through JSON, as used when importing content for a new page
    pub fn deep_copy(&self) -> Result<PageContent, StorageError> {
        Ok(serde_json::from_slice(&serde_json::to_vec(self)?)?)
    }
}

impl Visible for PageContent {
    fn is_forbidden(&self, roles: &RoleSet) -> bool {
        forbidden_for(&self.restrictions, roles)
    }

    fn accept_restriction(&mut self, roles: &RoleSet) {
        self.widgets.accept_restriction(roles);
    }

    fn accept_translation(&mut self, locale: Option<&str>) {
        self.widgets.accept_translation(locale);
    }
}

/// A page with its published and work-in-progress content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub version: u64,
    #[serde(default, serialize_with = "serialize_stored")]
    pub content: PageContent,
    #[serde(default, serialize_with = "serialize_stored")]
    pub wip_content: PageContent,
}

/// Stored shape of a content version, without the per-request attributes
#[derive(Serialize)]
struct StoredContent<'a> {
    id: &'a str,
    widgets: &'a [Widget],
}

fn serialize_stored<S: Serializer>(content: &PageContent, serializer: S) -> Result<S::Ok, S::Error> {
    StoredContent {
        id: &content.id,
        widgets: &content.widgets,
    }
    .serialize(serializer)
}

impl Page {
    /// A new, empty page at version 0 whose draft equals its published content
    pub fn new(id: impl Into<PageId>, restrictions: RoleSet) -> Self {
        let id = id.into();
        let mut content = PageContent::empty(id.clone());
        content.restrictions = restrictions;
        Self {
            id,
            alias: None,
            version: 0,
            wip_content: content.clone(),
            content,
        }
    }
}

impl Identified for Page {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for PageContent {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Primary page storage
pub trait PageRepository: Send + Sync {
    fn find_by_id(&self, page_id: &str) -> Result<Option<Page>, StorageError>;

    fn find_by_alias(&self, alias: &str) -> Result<Option<Page>, StorageError>;

    /// Look up by alias first, then by ID
    fn find_by_id_or_alias(&self, id_or_alias: &str) -> Result<Option<Page>, StorageError> {
        match self.find_by_alias(id_or_alias)? {
            Some(page) => Ok(Some(page)),
            None => self.find_by_id(id_or_alias),
        }
    }

    fn save(&self, page: &Page) -> Result<(), StorageError>;

    /// Remove the page, returning it if it existed
    fn delete_by_id(&self, page_id: &str) -> Result<Option<Page>, StorageError>;

    fn list(&self) -> Result<Vec<Page>, StorageError>;
}

/// Menu lookup used to derive a page's effective restrictions
pub trait MenuRepository: Send + Sync {
    fn load(&self) -> Result<Vec<Menu>, StorageError>;

    fn save(&self, menus: &[Menu]) -> Result<(), StorageError>;

    /// Effective restrictions of the menu entry targeting `page_id`
    fn find_restrictions(&self, page_id: &str) -> Result<RoleSet, StorageError> {
        Ok(menu::find_restrictions(&self.load()?, page_id))
    }
}
