//! Reconciliation plans
//!
//! Plans are pure set arithmetic over widget IDs. They say which widget
//! directories a transition touches and how, without touching the disk.

use crate::page::PageContent;
use serde::Serialize;
use std::collections::BTreeSet;

pub type WidgetIdSet = BTreeSet<String>;

/// File operations for replacing the draft content with an edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SavePlan {
    /// Published widgets plus the widgets of the edit
    pub retain: WidgetIdSet,
    /// Draft widgets nobody references any more; their whole directory goes
    pub delete: WidgetIdSet,
    /// Draft widgets dropped from the edit that stay published; only
    /// their draft copies go
    pub clean_wip: WidgetIdSet,
    /// Widgets of the edit, checked for dangling files
    pub purge: WidgetIdSet,
}

impl SavePlan {
    pub fn compute(published: &PageContent, wip: &PageContent, edit: &PageContent) -> Self {
        Self::from_ids(
            &published.widget_id_set(),
            &wip.widget_id_set(),
            &edit.widget_id_set(),
        )
    }

    pub fn from_ids(published: &WidgetIdSet, wip: &WidgetIdSet, edit: &WidgetIdSet) -> Self {
        let retain: WidgetIdSet = published.union(edit).cloned().collect();
        let delete: WidgetIdSet = wip.difference(&retain).cloned().collect();
        let clean_wip = wip
            .difference(edit)
            .filter(|id| !delete.contains(*id))
            .cloned()
            .collect();
        Self {
            retain,
            delete,
            clean_wip,
            purge: edit.clone(),
        }
    }

    /// Whether saving touches no directory besides the dangling-file check
    pub fn is_noop(&self) -> bool {
        self.delete.is_empty() && self.clean_wip.is_empty()
    }
}

/// File operations for promoting the draft to published
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishPlan {
    /// Draft widgets; their draft files replace the published ones
    pub retain: WidgetIdSet,
    /// Published widgets missing from the draft
    pub delete: WidgetIdSet,
}

impl PublishPlan {
    pub fn compute(published: &PageContent, wip: &PageContent) -> Self {
        Self::from_ids(&published.widget_id_set(), &wip.widget_id_set())
    }

    pub fn from_ids(published: &WidgetIdSet, wip: &WidgetIdSet) -> Self {
        Self {
            retain: wip.clone(),
            delete: published.difference(wip).cloned().collect(),
        }
    }
}

/// File operations for discarding the draft
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResetPlan {
    /// Published widgets; their draft directory is reseeded
    pub retain: WidgetIdSet,
    /// Draft-only widgets
    pub delete: WidgetIdSet,
}

impl ResetPlan {
    pub fn compute(published: &PageContent, wip: &PageContent) -> Self {
        Self::from_ids(&published.widget_id_set(), &wip.widget_id_set())
    }

    pub fn from_ids(published: &WidgetIdSet, wip: &WidgetIdSet) -> Self {
        Self {
            retain: published.clone(),
            delete: wip.difference(published).cloned().collect(),
        }
    }
}
