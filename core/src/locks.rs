//! Keyed in-process critical sections.
//!
//! The row store has no compare-and-swap, so the check-then-append sequence
//! of a reservation is only serialised by holding a lock per key (email, slot)
//! across it. This covers one process; separate instances sharing the same
//! spreadsheet can still race.
//!
//! Each entry counts its holders and waiters and is removed when the count
//! drops to zero, including when a waiting future is cancelled, so the table
//! stays proportional to in-flight requests.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
struct Entry {
    mutex: Arc<AsyncMutex<()>>,
    /// Holders plus waiters.
    users: usize,
}

/// A table of async mutexes, one per key.
#[derive(Debug)]
pub struct KeyedLocks<K> {
    entries: Mutex<HashMap<K, Entry>>,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`.
    ///
    /// Dropping the returned future before it resolves gives up the place in
    /// line and releases the entry.
    pub async fn lock(&self, key: K) -> KeyedGuard<'_, K> {
        let (ticket, mutex) = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            let entry = entries.entry(key.clone()).or_default();
            entry.users += 1;
            let mutex = Arc::clone(&entry.mutex);
            (Ticket { locks: self, key }, mutex)
        };
        let guard = mutex.lock_owned().await;
        KeyedGuard {
            _guard: guard,
            _ticket: ticket,
        }
    }

    /// Number of keys currently held or awaited.
    #[must_use]
    pub fn active(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn release(&self, key: &K) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get_mut(key) {
            entry.users = entry.users.saturating_sub(1);
            if entry.users == 0 {
                entries.remove(key);
            }
        }
    }
}

/// One registered user of a key, from the call to `lock` until the guard
/// (or the abandoned future) is dropped.
#[derive(Debug)]
struct Ticket<'a, K>
where
    K: Eq + Hash + Clone,
{
    locks: &'a KeyedLocks<K>,
    key: K,
}

impl<K> Drop for Ticket<'_, K>
where
    K: Eq + Hash + Clone,
{
    fn drop(&mut self) {
        self.locks.release(&self.key);
    }
}

/// Holds a key's lock until dropped.
///
/// Fields drop in order: the mutex is unlocked before the entry is released.
#[derive(Debug)]
pub struct KeyedGuard<'a, K>
where
    K: Eq + Hash + Clone,
{
    _guard: OwnedMutexGuard<()>,
    _ticket: Ticket<'a, K>,
}
