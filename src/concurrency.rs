//! Per-page lock table
//!
//! Mutating operations on a page's content and widget files are serialized
//! per page. Unrelated pages never wait on each other.

use parking_lot::{Mutex, RawMutex};
use std::collections::HashMap;
use std::sync::Arc;

/// Owned guard over one page's lock
pub type PageGuard = parking_lot::lock_api::ArcMutexGuard<RawMutex, ()>;

/// Hands out one mutex per page ID
#[derive(Debug, Default)]
pub struct PageLockManager {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PageLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock for `page_id`, created on first use
    pub fn get_lock(&self, page_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(page_id.to_string()).or_default())
    }

    /// Block until the page lock is acquired
    pub fn lock(&self, page_id: &str) -> PageGuard {
        self.get_lock(page_id).lock_arc()
    }

    pub fn try_lock(&self, page_id: &str) -> Option<PageGuard> {
        self.get_lock(page_id).try_lock_arc()
    }

    pub fn is_locked(&self, page_id: &str) -> bool {
        self.locks
            .lock()
            .get(page_id)
            .is_some_and(|lock| lock.is_locked())
    }

    /// Forget the lock of a deleted page.
    ///
    /// The entry stays while anyone else still holds or waits on it.
    /// Returns whether it was removed.
    pub fn remove(&self, page_id: &str) -> bool {
        let mut locks = self.locks.lock();
        let idle = locks
            .get(page_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            locks.remove(page_id);
        }
        idle
    }

    /// Number of pages with a lock entry
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}
