//! Per-sheet serialization of capture cycles.
//!
//! Two cycles for the same sheet would otherwise both see it missing and both
//! try to create it. Holding one async mutex per sheet across
//! check/provision/append makes the second cycle observe the first one's
//! sheet. Cycles for different sheets never wait on each other.
//!
//! A sheet's entry lives only while some cycle holds or waits for it, so the
//! map stays as small as the number of sheets currently in use.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<String, Arc<Mutex<()>>>;

#[derive(Debug, Default)]
pub struct SheetLocks {
    locks: Arc<LockMap>,
}

/// Exclusive hold on one sheet; released on drop.
#[derive(Debug)]
pub struct SheetLockGuard {
    key: String,
    locks: Arc<LockMap>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SheetLockGuard {
    fn drop(&mut self) {
        // Release the mutex first so its Arc count reflects remaining waiters.
        self.guard.take();
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

impl SheetLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other cycle holds `key`, then holds it until the guard drops.
    pub async fn acquire(&self, key: &str) -> SheetLockGuard {
        // The map entry must be released before awaiting the mutex.
        let mutex = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_owned().await;
        SheetLockGuard {
            key: key.to_string(),
            locks: Arc::clone(&self.locks),
            guard: Some(guard),
        }
    }

    /// Number of sheets currently held or waited on.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
