//! Sled-backed page and menu repositories

use crate::error::StorageError;
use crate::page::{Menu, MenuRepository, Page, PageRepository};
use std::path::Path;

const PAGE_PREFIX: &str = "page:";
const ALIAS_PREFIX: &str = "alias:";
const MENUS_KEY: &str = "menus";

/// Open (or create) the sled database shared by the repositories
pub fn open_database<P: AsRef<Path>>(path: P) -> Result<sled::Db, StorageError> {
    sled::open(path.as_ref()).map_err(|e| {
        StorageError::Database(format!(
            "Failed to open sled database at {}: {}",
            path.as_ref().display(),
            e
        ))
    })
}

fn page_key(page_id: &str) -> String {
    format!("{PAGE_PREFIX}{page_id}")
}

fn alias_key(alias: &str) -> String {
    format!("{ALIAS_PREFIX}{alias}")
}

/// Sled-based implementation of PageRepository
///
/// Pages are stored as JSON under `page:<id>`, with an `alias:<alias>`
/// index pointing back at the page ID.
#[derive(Clone)]
pub struct SledPageRepository {
    db: sled::Db,
}

impl SledPageRepository {
    pub fn from_db(db: sled::Db) -> Self {
        Self { db }
    }
}

impl PageRepository for SledPageRepository {
    fn find_by_id(&self, page_id: &str) -> Result<Option<Page>, StorageError> {
        match self.db.get(page_key(page_id))? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    fn find_by_alias(&self, alias: &str) -> Result<Option<Page>, StorageError> {
        match self.db.get(alias_key(alias))? {
            Some(page_id) => {
                let page_id = String::from_utf8_lossy(&page_id).into_owned();
                self.find_by_id(&page_id)
            }
            None => Ok(None),
        }
    }

    fn save(&self, page: &Page) -> Result<(), StorageError> {
        let previous_alias = self.find_by_id(&page.id)?.and_then(|p| p.alias);
        let value = serde_json::to_vec(page)?;

        let mut batch = sled::Batch::default();
        if let Some(previous) = previous_alias.filter(|a| page.alias.as_ref() != Some(a)) {
            batch.remove(alias_key(&previous).as_bytes());
        }
        batch.insert(page_key(&page.id).as_bytes(), value);
        if let Some(alias) = page.alias.as_deref().filter(|a| !a.is_empty()) {
            batch.insert(alias_key(alias).as_bytes(), page.id.as_bytes());
        }
        self.db.apply_batch(batch)?;
        Ok(())
    }

    fn delete_by_id(&self, page_id: &str) -> Result<Option<Page>, StorageError> {
        let Some(page) = self.find_by_id(page_id)? else {
            return Ok(None);
        };
        let mut batch = sled::Batch::default();
        batch.remove(page_key(page_id).as_bytes());
        if let Some(alias) = page.alias.as_deref() {
            batch.remove(alias_key(alias).as_bytes());
        }
        self.db.apply_batch(batch)?;
        Ok(Some(page))
    }

    fn list(&self) -> Result<Vec<Page>, StorageError> {
        let mut pages = Vec::new();
        for item in self.db.scan_prefix(PAGE_PREFIX) {
            let (_, value) = item?;
            pages.push(serde_json::from_slice(&value)?);
        }
        Ok(pages)
    }
}

/// Sled-based implementation of MenuRepository
///
/// The whole menu tree is a single JSON document under `menus`.
#[derive(Clone)]
pub struct SledMenuRepository {
    db: sled::Db,
}

impl SledMenuRepository {
    pub fn from_db(db: sled::Db) -> Self {
        Self { db }
    }
}

impl MenuRepository for SledMenuRepository {
    fn load(&self) -> Result<Vec<Menu>, StorageError> {
        match self.db.get(MENUS_KEY)? {
            Some(value) => Ok(serde_json::from_slice(&value)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, menus: &[Menu]) -> Result<(), StorageError> {
        self.db.insert(MENUS_KEY, serde_json::to_vec(menus)?)?;
        Ok(())
    }
}
