//! Cache Element Module
//!
//! Defines a single stored value together with its size and expiration.

use chrono::{DateTime, Utc};

// == Element ==
/// A stored value with its accounted size and absolute expiration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<V> {
    /// The stored value
    pub value: V,
    /// Size charged against the cache capacity
    pub size: u64,
    /// Instant at which the element stops being served
    pub expire_at: DateTime<Utc>,
}

impl<V> Element<V> {
    // == Constructor ==
    pub fn new(value: V, size: u64, expire_at: DateTime<Utc>) -> Self {
        Self {
            value,
            size,
            expire_at,
        }
    }

    // == Is Expired ==
    /// Checks whether the element has expired at `now`.
    ///
    /// An element is expired once `now` reaches `expire_at`, so a zero TTL
    /// yields an element that is expired from the moment it is stored.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expire_at
    }

    // == Time To Live ==
    /// Returns whole seconds left before expiration, or 0 if already expired.
    pub fn ttl_remaining(&self, now: DateTime<Utc>) -> u64 {
        let remaining = (self.expire_at - now).num_seconds();
        u64::try_from(remaining).unwrap_or(0)
    }
}
