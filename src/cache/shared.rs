//! Shared Cache Module
//!
//! Thread-safe handle over a [`CacheStore`] with an injected clock.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::{CacheStats, CacheStore};
use crate::clock::{offset_secs, Clock, SystemClock};

// == Expire Cache ==
/// A size-bounded, TTL-aware cache shared between threads.
///
/// Cloning is cheap and every clone refers to the same storage. All state
/// sits behind one lock, held for the whole of each operation and never
/// across a sleep, so operations are linearizable.
pub struct ExpireCache<K, V> {
    store: Arc<Mutex<CacheStore<K, V>>>,
    clock: Arc<dyn Clock>,
}

impl<K, V> Clone for ExpireCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<K, V> fmt::Debug for ExpireCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpireCache").finish_non_exhaustive()
    }
}

impl<K, V> ExpireCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructors ==
    /// Creates an empty cache on the system clock.
    ///
    /// # Arguments
    /// * `max_size` - Capacity in the same units as entry sizes; 0 = unbounded
    pub fn new(max_size: u64) -> Self {
        Self::with_clock(max_size, Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(max_size: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(Mutex::new(CacheStore::new(max_size))),
            clock,
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl_secs` seconds from now.
    ///
    /// A zero or negative TTL stores an entry that is already expired.
    pub fn set(&self, key: K, value: V, size: u64, ttl_secs: i64) {
        let mut store = self.store.lock();
        let expire_at = offset_secs(self.clock.now(), ttl_secs);
        store.set(key, value, size, expire_at);
    }

    // == Get ==
    /// Returns a copy of the live value for `key`, or None if it is absent
    /// or expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut store = self.store.lock();
        let now = self.clock.now();
        store.get(key, now).cloned()
    }

    // == Get Or Set ==
    /// Returns the live value for `key`, storing `default` first if there is
    /// none. The check and the insert happen under one lock acquisition.
    pub fn get_or_set(&self, key: K, default: V, size: u64, ttl_secs: i64) -> V {
        let mut store = self.store.lock();
        let now = self.clock.now();
        store.get_or_set(key, default, size, offset_secs(now, ttl_secs), now)
    }

    // == Remove ==
    /// Removes `key` regardless of its expiration.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.store.lock().remove(key)
    }

    // == TTL ==
    /// Returns whole seconds left for a live entry.
    pub fn ttl(&self, key: &K) -> Option<u64> {
        let store = self.store.lock();
        store.ttl(key, self.clock.now())
    }

    // == Sweep ==
    /// Removes every expired entry and returns how many were removed.
    ///
    /// This is one cycle of the background sweeper; see
    /// [`spawn_cleaner`](crate::tasks::spawn_cleaner).
    pub fn sweep_expired(&self) -> usize {
        let mut store = self.store.lock();
        let now = self.clock.now();
        store.sweep_expired(now)
    }

    // == Introspection ==
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn total_size(&self) -> u64 {
        self.store.lock().total_size()
    }

    pub fn max_size(&self) -> u64 {
        self.store.lock().max_size()
    }

    #[cfg(test)]
    pub(crate) fn with_store<R>(&self, f: impl FnOnce(&CacheStore<K, V>) -> R) -> R {
        f(&*self.store.lock())
    }
}
