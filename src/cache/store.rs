//! Cache Store Module
//!
//! Unsynchronized cache engine: element map, insertion order and size
//! accounting. Every operation takes the current instant explicitly; locking
//! and the clock live in [`ExpireCache`](crate::cache::ExpireCache).

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::{CacheStats, Element, InsertionOrder};

// == Cache Store ==
/// Size-bounded storage with per-element expiration.
///
/// Invariants:
/// - every key in `entries` appears exactly once in `order`, and vice versa
/// - `total_size` is the sum of the sizes of all elements in `entries`
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-element storage
    entries: HashMap<K, Element<V>>,
    /// Keys in insertion order
    order: InsertionOrder<K>,
    /// Sum of element sizes
    total_size: u64,
    /// Capacity bound, 0 = unbounded
    max_size: u64,
    /// Performance statistics
    stats: CacheStats,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates an empty store. A `max_size` of 0 disables the size bound.
    pub fn new(max_size: u64) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            total_size: 0,
            max_size,
            stats: CacheStats::new(),
        }
    }

    // == Set ==
    /// Inserts or replaces the element for `key`.
    ///
    /// A replaced element keeps its slot in the insertion order. After the
    /// write, the oldest other keys are evicted until the size bound holds;
    /// the key just written is never evicted here, so a single oversized
    /// element may exceed the bound on its own. This holds for an update of
    /// the oldest key too: it keeps its slot and the next oldest key goes.
    pub fn set(&mut self, key: K, value: V, size: u64, expire_at: DateTime<Utc>) {
        match self.entries.get_mut(&key) {
            Some(element) => {
                self.total_size = self
                    .total_size
                    .saturating_sub(element.size)
                    .saturating_add(size);
                element.value = value;
                element.size = size;
                element.expire_at = expire_at;
            }
            None => {
                self.order.push_back(key.clone());
                self.entries
                    .insert(key.clone(), Element::new(value, size, expire_at));
                self.total_size = self.total_size.saturating_add(size);
            }
        }

        self.enforce_capacity(&key);
    }

    // == Get ==
    /// Returns the live value for `key`.
    ///
    /// An element found expired at `now` is removed on the spot; that removal
    /// scans the insertion order, so it is O(n) in the number of entries.
    pub fn get(&mut self, key: &K, now: DateTime<Utc>) -> Option<&V> {
        let expired = match self.entries.get(key) {
            Some(element) => element.is_expired(now),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.unlink(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.entries.get(key).map(|element| &element.value)
    }

    // == Get Or Set ==
    /// Returns the live value for `key`, or stores `default` and returns it.
    ///
    /// When a live value exists the other arguments are discarded.
    pub fn get_or_set(
        &mut self,
        key: K,
        default: V,
        size: u64,
        expire_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> V
    where
        V: Clone,
    {
        if let Some(value) = self.get(&key, now) {
            return value.clone();
        }

        self.set(key, default.clone(), size, expire_at);
        default
    }

    // == Remove ==
    /// Removes an element regardless of its expiration.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.unlink(key).map(|element| element.value)
    }

    // == TTL ==
    /// Returns whole seconds left for a live element.
    pub fn ttl(&self, key: &K, now: DateTime<Utc>) -> Option<u64> {
        self.entries
            .get(key)
            .filter(|element| !element.is_expired(now))
            .map(|element| element.ttl_remaining(now))
    }

    // == Sweep Expired ==
    /// Removes every element expired at `now`.
    ///
    /// Walks the whole insertion order, since TTLs are independent of
    /// insertion order. Returns the number of elements removed.
    pub fn sweep_expired(&mut self, now: DateTime<Utc>) -> usize {
        let entries = &mut self.entries;
        let mut removed = 0;
        let mut freed: u64 = 0;

        self.order.retain(|key| {
            let expired = entries
                .get(key)
                .map_or(true, |element| element.is_expired(now));
            if expired {
                if let Some(element) = entries.remove(key) {
                    freed = freed.saturating_add(element.size);
                    removed += 1;
                }
            }
            !expired
        });

        self.total_size = self.total_size.saturating_sub(freed);
        self.stats.record_expirations(removed);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_occupancy(self.entries.len(), self.total_size);
        stats
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included until
    /// they are reclaimed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    // == Internals ==
    fn unlink(&mut self, key: &K) -> Option<Element<V>> {
        let element = self.entries.remove(key)?;
        self.order.remove(key);
        self.total_size = self.total_size.saturating_sub(element.size);
        Some(element)
    }

    fn enforce_capacity(&mut self, keep: &K) {
        if self.max_size == 0 {
            return;
        }

        while self.total_size > self.max_size {
            let Some(victim) = self.order.pop_oldest_except(keep) else {
                break;
            };
            if let Some(element) = self.entries.remove(&victim) {
                self.total_size = self.total_size.saturating_sub(element.size);
                debug!(
                    size = element.size,
                    total_size = self.total_size,
                    max_size = self.max_size,
                    "Evicted oldest entry to fit size bound"
                );
            }
            self.stats.record_eviction();
        }
    }

    /// Checks the map/order/size invariants.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let sum = self
            .entries
            .values()
            .fold(0u64, |acc, element| acc.saturating_add(element.size));
        let order_matches = self.order.len() == self.entries.len()
            && self.order.iter().all(|key| self.entries.contains_key(key));
        sum == self.total_size && order_matches
    }

    /// Keys from oldest to newest insertion.
    #[cfg(test)]
    pub(crate) fn keys_in_order(&self) -> Vec<K> {
        self.order.iter().cloned().collect()
    }
}
