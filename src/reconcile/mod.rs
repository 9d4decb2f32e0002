//! Draft/Publish Reconciler
//!
//! Applies the widget-directory side of the page state transitions: save,
//! publish, reset and lazy draft initialization. Each transition computes a
//! pure plan first ([`plan`]), then applies it. Widget directories are
//! independent of each other, so every phase fans out over widget IDs with
//! rayon; within one widget, deletions finish before copies.
//!
//! Callers hold the page lock for the whole transition and commit the page
//! entity only after the file operations succeeded.

pub mod plan;

pub use plan::{PublishPlan, ResetPlan, SavePlan, WidgetIdSet};

use crate::assets::AssetManager;
use crate::error::StorageError;
use crate::page::{Page, PageContent};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Where a page stands between its draft and its published content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    /// The draft equals the published content
    Published,
    /// The draft diverges from the published content
    WorkInProgress,
    /// A transition is running on the page
    Reconciling,
}

impl PageState {
    pub fn of(page: &Page, reconciling: bool) -> Self {
        if reconciling {
            PageState::Reconciling
        } else if page.content.same_content(&page.wip_content) {
            PageState::Published
        } else {
            PageState::WorkInProgress
        }
    }
}

impl std::fmt::Display for PageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageState::Published => write!(f, "published"),
            PageState::WorkInProgress => write!(f, "work-in-progress"),
            PageState::Reconciling => write!(f, "reconciling"),
        }
    }
}

/// Applies reconciliation plans to the widget directories
pub struct Reconciler {
    assets: Arc<AssetManager>,
}

impl Reconciler {
    pub fn new(assets: Arc<AssetManager>) -> Self {
        Self { assets }
    }

    pub fn assets(&self) -> &Arc<AssetManager> {
        &self.assets
    }

    /// File side of replacing the page's draft with `edit`
    pub fn save(&self, page: &Page, edit: &PageContent) -> Result<SavePlan, StorageError> {
        let plan = SavePlan::compute(&page.content, &page.wip_content, edit);
        debug!(page_id = %page.id, ?plan, "Applying save plan");

        self.delete_widget_dirs(&plan.delete)?;

        plan.clean_wip
            .par_iter()
            .try_for_each(|widget_id| self.assets.clean_wip(widget_id))?;

        edit.widgets
            .par_iter()
            .try_for_each(|widget| self.assets.purge_dangling(widget).map(|_| ()))?;

        info!(
            page_id = %page.id,
            deleted = plan.delete.len(),
            cleaned = plan.clean_wip.len(),
            "Reconciled draft files"
        );
        Ok(plan)
    }

    /// File side of promoting the draft to published
    pub fn publish(&self, page: &Page) -> Result<PublishPlan, StorageError> {
        let plan = PublishPlan::compute(&page.content, &page.wip_content);
        debug!(page_id = %page.id, ?plan, "Applying publish plan");

        self.delete_widget_dirs(&plan.delete)?;
        plan.retain
            .par_iter()
            .try_for_each(|widget_id| self.assets.promote_wip(widget_id))?;

        info!(
            page_id = %page.id,
            promoted = plan.retain.len(),
            deleted = plan.delete.len(),
            "Published draft files"
        );
        Ok(plan)
    }

    /// File side of discarding the draft
    pub fn reset(&self, page: &Page) -> Result<ResetPlan, StorageError> {
        let plan = ResetPlan::compute(&page.content, &page.wip_content);
        debug!(page_id = %page.id, ?plan, "Applying reset plan");

        self.delete_widget_dirs(&plan.delete)?;
        page.content
            .widgets
            .par_iter()
            .try_for_each(|widget| self.assets.reseed_wip(widget))?;

        info!(
            page_id = %page.id,
            reseeded = plan.retain.len(),
            deleted = plan.delete.len(),
            "Reset draft files"
        );
        Ok(plan)
    }

    /// Whether any draft widget still lacks its draft directory
    pub fn wip_needs_initialization(&self, content: &PageContent) -> Result<bool, StorageError> {
        for widget in &content.widgets {
            if self.assets.needs_wip_initialization(widget.id())? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Seed missing draft directories from the published files.
    ///
    /// Returns the number of initialized widgets.
    pub fn initialize_wip(&self, content: &PageContent) -> Result<usize, StorageError> {
        let initialized = AtomicUsize::new(0);
        content.widgets.par_iter().try_for_each(|widget| {
            if self.assets.initialize_wip(widget.id())? {
                initialized.fetch_add(1, Ordering::Relaxed);
            }
            Ok::<(), StorageError>(())
        })?;
        let initialized = initialized.into_inner();
        if initialized > 0 {
            info!(page_id = %content.id, initialized, "Initialized draft directories");
        }
        Ok(initialized)
    }

    /// Remove every directory of the page's widgets, draft and published
    pub fn delete_all(&self, page: &Page) -> Result<WidgetIdSet, StorageError> {
        let widget_ids: WidgetIdSet = page
            .content
            .widget_id_set()
            .union(&page.wip_content.widget_id_set())
            .cloned()
            .collect();
        self.delete_widget_dirs(&widget_ids)?;
        Ok(widget_ids)
    }

    fn delete_widget_dirs(&self, widget_ids: &WidgetIdSet) -> Result<(), StorageError> {
        widget_ids
            .par_iter()
            .try_for_each(|widget_id| self.assets.delete_widget_dir(widget_id))
    }
}
