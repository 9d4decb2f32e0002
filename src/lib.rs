//! Curio: Draft/Publish Content Engine
//!
//! Pages are built from widgets; each page keeps a published and a draft
//! (work-in-progress) content. Widget files live in sharded directories with
//! a `wip/` subdirectory for the draft, and every state transition reconciles
//! those directories with the page entities. Content leaving the engine is
//! projected for the caller: restricted widgets are removed and texts are
//! translated to the caller's locale.

pub mod api;
pub mod assets;
pub mod cli;
pub mod concurrency;
pub mod config;
pub mod entity;
pub mod error;
pub mod files;
pub mod logging;
pub mod page;
pub mod reconcile;
pub mod types;
pub mod visibility;
pub mod widget;

pub use api::{PageApi, PageIdAndAlias, PageSummary};
pub use error::{ApiError, StorageError};
pub use page::{Menu, Page, PageContent};
pub use types::{CallerContext, PageId, RoleSet, WidgetId};
