//! Page APIs
//!
//! Use cases for creating, editing, publishing and serving pages. Every call
//! that renders content for a caller takes a [`CallerContext`] and runs the
//! result through the visibility [`Projection`] before returning it.

use crate::assets::{AssetManager, ImageSize};
use crate::concurrency::{PageGuard, PageLockManager};
use crate::config::CurioConfig;
use crate::entity::EntityStore;
use crate::error::ApiError;
use crate::files::{is_shardable, FileRepository, FilesystemRepository};
use crate::page::persistence::open_database;
use crate::page::{
    Menu, MenuRepository, Page, PageContent, PageRepository, SledMenuRepository,
    SledPageRepository,
};
use crate::reconcile::{PageState, Reconciler};
use crate::types::{is_uuid, new_id, CallerContext, PageId, RoleSet};
use crate::visibility::Projection;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// ID and alias of the configured index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageIdAndAlias {
    pub id: PageId,
    pub alias: Option<String>,
}

/// Overview of one page, as listed by [`PageApi::list_pages`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub id: PageId,
    pub alias: Option<String>,
    pub version: u64,
    pub state: PageState,
    pub widgets: usize,
    pub wip_widgets: usize,
}

/// Page API service
///
/// Holds the repositories, the asset manager and the per-page lock table.
/// Mutating calls take the page lock, apply file-system side effects first
/// and commit the page entity last.
pub struct PageApi {
    /// Primary page storage
    pages: Arc<dyn PageRepository>,
    /// Menus, for effective page restrictions
    menus: Arc<dyn MenuRepository>,
    /// Reconciler over the widget directories
    reconciler: Reconciler,
    /// JSON mirror of pages (side artifact, failures are swallowed)
    entities: Arc<EntityStore>,
    /// Category of the page JSON mirror
    entity_category: String,
    /// Per-page locks
    lock_manager: Arc<PageLockManager>,
    /// Serializes alias claims across pages
    alias_lock: Mutex<()>,
    index_page_id: Option<PageId>,
}

impl PageApi {
    /// Create a new Page API service
    pub fn new(
        pages: Arc<dyn PageRepository>,
        menus: Arc<dyn MenuRepository>,
        assets: Arc<AssetManager>,
        entities: Arc<EntityStore>,
        lock_manager: Arc<PageLockManager>,
    ) -> Self {
        Self {
            pages,
            menus,
            reconciler: Reconciler::new(assets),
            entities,
            entity_category: "pages".to_string(),
            lock_manager,
            alias_lock: Mutex::new(()),
            index_page_id: None,
        }
    }

    /// Wire the service from configuration: sled repositories at the
    /// database path, widget files under the widgets directory.
    pub fn open(config: &CurioConfig) -> Result<Self, ApiError> {
        config.ensure_valid()?;

        let files: Arc<dyn FileRepository> = Arc::new(FilesystemRepository::new());
        let database_path = config.database_path();
        if let Some(parent) = database_path.parent() {
            files.create_dir_if_required(parent)?;
        }
        let db = open_database(&database_path)?;

        let json = &config.storage.json_persistence;
        let entities = EntityStore::new(
            config.root(),
            json.file_name.clone(),
            json.enabled,
            Arc::clone(&files),
        );
        let assets = AssetManager::new(config.widgets_dir(), files);

        let mut api = Self::new(
            Arc::new(SledPageRepository::from_db(db.clone())),
            Arc::new(SledMenuRepository::from_db(db)),
            Arc::new(assets),
            Arc::new(entities),
            Arc::new(PageLockManager::new()),
        );
        api.entity_category = json.pages_dir.to_string_lossy().into_owned();
        api.index_page_id = config.index_page_id.clone();
        Ok(api)
    }

    pub fn with_index_page(mut self, page_id: impl Into<PageId>) -> Self {
        self.index_page_id = Some(page_id.into());
        self
    }

    pub fn assets(&self) -> &Arc<AssetManager> {
        self.reconciler.assets()
    }

    pub fn lock_manager(&self) -> &Arc<PageLockManager> {
        &self.lock_manager
    }

    /// Create an empty page at version 0.
    ///
    /// The draft starts out equal to the published content.
    pub fn create_page(&self, restrictions: RoleSet) -> Result<Page, ApiError> {
        let page = Page::new(new_id(), restrictions);
        self.commit(&page)?;
        info!(page_id = %page.id, "Created page");
        Ok(page)
    }

    /// Delete a page with the directories of all its widgets.
    ///
    /// Widgets of both the published and the draft content are removed.
    pub fn delete_page(&self, id_or_alias: &str) -> Result<(), ApiError> {
        let (guard, page) = self.lock_page(id_or_alias)?;

        let removed = self.reconciler.delete_all(&page)?;
        self.pages.delete_by_id(&page.id)?;
        self.entities.delete(&self.entity_category, &page.id);
        drop(guard);
        self.lock_manager.remove(&page.id);
        info!(page_id = %page.id, widgets = removed.len(), "Deleted page");
        Ok(())
    }

    /// Set or clear a page's alias.
    ///
    /// # Arguments
    /// * `page_id` - The page's ID (aliases are not resolved here)
    /// * `alias` - New alias; `None` or blank clears it
    ///
    /// # Returns
    /// * `ApiError::NotFound` - No page with that ID
    /// * `ApiError::InvalidRequest` - The alias belongs to another page or looks like a page ID
    pub fn update_page_alias(&self, page_id: &str, alias: Option<&str>) -> Result<Page, ApiError> {
        let alias = alias.map(str::trim).filter(|a| !a.is_empty());
        if let Some(alias) = alias {
            if is_uuid(alias) {
                return Err(ApiError::InvalidRequest(format!(
                    "Alias '{}' cannot be shaped like a page ID",
                    alias
                )));
            }
        }

        let _guard = self.lock_manager.lock(page_id);
        let mut page = self
            .pages
            .find_by_id(page_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Page {}", page_id)))?;

        // Check and commit must not interleave with another page claiming the alias
        let _alias_guard = self.alias_lock.lock();
        if let Some(alias) = alias {
            if let Some(owner) = self.pages.find_by_alias(alias)? {
                if owner.id != page.id {
                    return Err(ApiError::InvalidRequest(format!(
                        "Alias '{}' is already used by page {}",
                        alias, owner.id
                    )));
                }
            }
        }

        page.alias = alias.map(str::to_string);
        self.commit(&page)?;
        info!(page_id = %page.id, alias = ?page.alias, "Updated page alias");
        Ok(page)
    }

    /// ID and alias of the configured index page, if it exists
    pub fn load_index_page(&self) -> Result<Option<PageIdAndAlias>, ApiError> {
        let Some(index_page_id) = self.index_page_id.as_deref().filter(|id| !id.trim().is_empty())
        else {
            return Ok(None);
        };
        Ok(self.pages.find_by_id(index_page_id)?.map(|page| PageIdAndAlias {
            id: page.id,
            alias: page.alias,
        }))
    }

    /// Published content as the caller may see it
    ///
    /// # Behavior
    /// * `editable` is computed for the caller's roles
    /// * Restrictions come from the menu entry targeting the page
    /// * Forbidden widgets are removed, texts are translated to the caller's locale
    /// * A page the caller may not see at all is `ApiError::PermissionDenied`
    pub fn load_content(
        &self,
        id_or_alias: &str,
        caller: &CallerContext,
    ) -> Result<PageContent, ApiError> {
        let page = self.find_page(id_or_alias)?;
        self.render(page.content, &page.id, caller)
    }

    /// Draft content as the caller may see it.
    ///
    /// Published widgets whose draft directory does not exist yet get it
    /// seeded from their published files first; the draft content is then
    /// reset to the published content.
    pub fn load_wip_content(
        &self,
        id_or_alias: &str,
        caller: &CallerContext,
    ) -> Result<PageContent, ApiError> {
        let mut page = self.find_page(id_or_alias)?;

        if self.reconciler.wip_needs_initialization(&page.content)? {
            let (_guard, mut locked) = self.lock_page(&page.id)?;
            if self.reconciler.initialize_wip(&locked.content)? > 0 {
                locked.wip_content = locked.content.clone();
                self.commit(&locked)?;
            }
            page = locked;
        }

        self.render(page.wip_content, &page.id, caller)
    }

    /// Replace the page's draft with `edit`.
    ///
    /// # Arguments
    /// * `id_or_alias` - Page ID or alias; an unknown page ID imports `edit` as a new page
    /// * `caller` - Must be able to edit the current draft
    /// * `edit` - Full replacement of the draft content
    ///
    /// # Returns
    /// * The saved draft, projected for the caller
    /// * `ApiError::PermissionDenied` - The current draft is not editable for the caller
    ///
    /// # Behavior
    /// * Missing widget and text IDs are generated
    /// * Widget files no longer referenced by draft or published content are deleted
    /// * The version increments and the alias is kept
    pub fn save_content(
        &self,
        id_or_alias: &str,
        caller: &CallerContext,
        mut edit: PageContent,
    ) -> Result<PageContent, ApiError> {
        if id_or_alias.trim().is_empty() {
            return Err(ApiError::InvalidRequest("Page id or alias is missing".to_string()));
        }
        for widget in &mut edit.widgets {
            widget.assign_missing_ids();
        }
        validate_widget_ids(&edit)?;

        let lock_key = match self.pages.find_by_id_or_alias(id_or_alias)? {
            Some(page) => page.id,
            None => id_or_alias.to_string(),
        };
        let guard = self.lock_manager.lock(&lock_key);
        let result = self.save_locked(&lock_key, caller, edit);
        drop(guard);

        // A failed import leaves no page behind to keep a lock for
        if result.is_err() && matches!(self.pages.find_by_id(&lock_key), Ok(None)) {
            self.lock_manager.remove(&lock_key);
        }
        result
    }

    fn save_locked(
        &self,
        page_id: &str,
        caller: &CallerContext,
        mut edit: PageContent,
    ) -> Result<PageContent, ApiError> {
        let mut page = match self.pages.find_by_id(page_id)? {
            Some(page) => page,
            None => {
                debug!(page_id, "Importing content as a new page");
                let mut page = Page::new(page_id, RoleSet::new());
                edit.id = page_id.to_string();
                page.content = edit.for_storage();
                page.wip_content = edit.deep_copy()?.for_storage();
                page
            }
        };

        if !page.wip_content.is_editable_by(&caller.roles) {
            return Err(ApiError::PermissionDenied(format!(
                "Page {} cannot be edited by the current user",
                page.id
            )));
        }

        edit.id = page.id.clone();
        self.reconciler.save(&page, &edit)?;

        page.wip_content = edit.for_storage();
        page.version += 1;
        self.commit(&page)?;
        info!(page_id = %page.id, version = page.version, "Saved draft content");

        let mut saved = page.wip_content;
        saved.compute_editable(&caller.roles);
        self.project(saved, caller)
    }

    /// Discard the draft, restoring it from the published content
    pub fn reset_wip_content(&self, id_or_alias: &str) -> Result<PageContent, ApiError> {
        let (_guard, mut page) = self.lock_page(id_or_alias)?;

        self.reconciler.reset(&page)?;
        page.wip_content = page.content.clone();
        self.commit(&page)?;
        info!(page_id = %page.id, "Reset draft content");
        Ok(page.wip_content)
    }

    /// Make the draft the published content, files included
    pub fn publish_wip_content(&self, id_or_alias: &str) -> Result<PageContent, ApiError> {
        let (_guard, mut page) = self.lock_page(id_or_alias)?;

        self.reconciler.publish(&page)?;
        page.content = page.wip_content.clone();
        self.commit(&page)?;
        info!(page_id = %page.id, version = page.version, "Published draft content");
        Ok(page.content)
    }

    /// Store an uploaded file for a draft widget.
    ///
    /// Returns the stored file name.
    pub fn save_widget_file(
        &self,
        page_id: &str,
        widget_id: &str,
        file_name: &str,
        source: &mut dyn Read,
    ) -> Result<String, ApiError> {
        let (_guard, mut page) = self.lock_page(page_id)?;
        let widget = page
            .wip_content
            .widget_mut(widget_id)
            .ok_or_else(|| not_found_widget(widget_id, page_id))?;

        let stored = self.assets().save_file(widget, file_name, source)?;
        self.commit(&page)?;
        Ok(stored)
    }

    /// Delete a draft widget's file and its scaled derivatives.
    ///
    /// Returns the updated draft content.
    pub fn delete_widget_file(
        &self,
        page_id: &str,
        widget_id: &str,
        file_name: &str,
    ) -> Result<PageContent, ApiError> {
        let (_guard, mut page) = self.lock_page(page_id)?;
        let widget = page
            .wip_content
            .widget_mut(widget_id)
            .ok_or_else(|| not_found_widget(widget_id, page_id))?;

        self.assets().delete_file(widget, file_name)?;
        self.commit(&page)?;
        Ok(page.wip_content)
    }

    /// Read a widget file, from the draft or the published directory.
    ///
    /// Requesting a size other than `Original` serves (and creates on first
    /// request) the scaled derivative.
    pub fn load_widget_file(
        &self,
        widget_id: &str,
        file_name: &str,
        size: Option<ImageSize>,
        wip: bool,
    ) -> Result<Vec<u8>, ApiError> {
        if !is_shardable(widget_id) {
            return Err(ApiError::NotFound(format!("Widget {}", widget_id)));
        }
        Ok(self.assets().load_file(widget_id, file_name, size, wip)?)
    }

    /// Current state of the page between draft and published content
    pub fn page_state(&self, id_or_alias: &str) -> Result<PageState, ApiError> {
        let page = self.find_page(id_or_alias)?;
        Ok(PageState::of(&page, self.lock_manager.is_locked(&page.id)))
    }

    pub fn list_pages(&self) -> Result<Vec<PageSummary>, ApiError> {
        let mut summaries: Vec<PageSummary> = self
            .pages
            .list()?
            .into_iter()
            .map(|page| PageSummary {
                state: PageState::of(&page, self.lock_manager.is_locked(&page.id)),
                widgets: page.content.widgets.len(),
                wip_widgets: page.wip_content.widgets.len(),
                version: page.version,
                alias: page.alias,
                id: page.id,
            })
            .collect();
        summaries.sort_by(|a, b| a.alias.cmp(&b.alias).then_with(|| a.id.cmp(&b.id)));
        Ok(summaries)
    }

    pub fn load_menus(&self) -> Result<Vec<Menu>, ApiError> {
        Ok(self.menus.load()?)
    }

    pub fn save_menus(&self, menus: &[Menu]) -> Result<(), ApiError> {
        self.menus.save(menus)?;
        info!(menus = menus.len(), "Saved menus");
        Ok(())
    }

    /// Raw page as stored, without projection
    pub fn find_page(&self, id_or_alias: &str) -> Result<Page, ApiError> {
        if id_or_alias.trim().is_empty() {
            return Err(ApiError::InvalidRequest("Page id or alias is missing".to_string()));
        }
        self.pages
            .find_by_id_or_alias(id_or_alias)?
            .ok_or_else(|| ApiError::NotFound(format!("Page not found for ID or alias: {}", id_or_alias)))
    }

    /// Resolve the page, take its lock and reload it under the lock
    fn lock_page(&self, id_or_alias: &str) -> Result<(PageGuard, Page), ApiError> {
        let page_id = self.find_page(id_or_alias)?.id;
        let guard = self.lock_manager.lock(&page_id);
        let page = self
            .pages
            .find_by_id(&page_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Page {}", page_id)))?;
        Ok((guard, page))
    }

    fn commit(&self, page: &Page) -> Result<(), ApiError> {
        self.pages.save(page)?;
        self.entities.persist(&self.entity_category, page);
        Ok(())
    }

    fn render(
        &self,
        mut content: PageContent,
        page_id: &str,
        caller: &CallerContext,
    ) -> Result<PageContent, ApiError> {
        content.compute_editable(&caller.roles);
        content.restrictions = self.menus.find_restrictions(page_id)?;
        self.project(content, caller)
    }

    fn project(&self, content: PageContent, caller: &CallerContext) -> Result<PageContent, ApiError> {
        let page_id = content.id.clone();
        Projection::for_caller(caller).apply(content).ok_or_else(|| {
            warn!(page_id = %page_id, "Page is not visible for the caller");
            ApiError::PermissionDenied(format!("Page {} is not visible for the caller", page_id))
        })
    }
}

fn not_found_widget(widget_id: &str, page_id: &str) -> ApiError {
    ApiError::NotFound(format!("Widget {} on page {}", widget_id, page_id))
}

/// Widget IDs must be unique and long enough to shard their directories
fn validate_widget_ids(content: &PageContent) -> Result<(), ApiError> {
    let mut seen = BTreeSet::new();
    for widget in &content.widgets {
        let id = widget.id();
        if !is_shardable(id) {
            return Err(ApiError::InvalidRequest(format!("Invalid widget ID: '{}'", id)));
        }
        if !seen.insert(id) {
            return Err(ApiError::InvalidRequest(format!("Duplicate widget ID: '{}'", id)));
        }
    }
    Ok(())
}
