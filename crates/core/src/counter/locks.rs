//! Per-article mutual exclusion.
//!
//! Slots are created on first use and removed by the last lease holder,
//! so the table only holds ids with work in flight.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::store::ArticleId;

type Slot = Arc<AsyncMutex<()>>;

/// Table of async mutexes keyed by article id.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    slots: Mutex<HashMap<ArticleId, Slot>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    ///
    /// Leases on different ids never contend beyond the table lookup.
    pub async fn lock(&self, id: ArticleId) -> KeyLease<'_> {
        let slot = Arc::clone(self.table().entry(id).or_default());
        let guard = slot.lock_owned().await;
        KeyLease { locks: self, id, guard: Some(guard) }
    }

    /// Number of ids with a live slot.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.table().len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn table(&self) -> MutexGuard<'_, HashMap<ArticleId, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive access to one article id, released on drop.
#[must_use = "the lock is released as soon as the lease is dropped"]
#[derive(Debug)]
pub struct KeyLease<'a> {
    locks: &'a KeyedLocks,
    id: ArticleId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyLease<'_> {
    fn drop(&mut self) {
        // Waiters clone the slot under the table lock, so a count of one
        // here means nobody else is queued on it.
        let mut table = self.locks.table();
        drop(self.guard.take());
        if table.get(&self.id).is_some_and(|slot| Arc::strong_count(slot) == 1) {
            table.remove(&self.id);
        }
    }
}
