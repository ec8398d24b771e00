//! Cache Module
//!
//! In-memory caching bounded by total entry size, with per-entry TTL.
//! Overflow evicts in insertion order; expired entries are reclaimed on read
//! and by the background sweeper in [`crate::tasks`].

mod entry;
mod order;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::Element;
pub use order::InsertionOrder;
pub use shared::ExpireCache;
pub use stats::CacheStats;
pub use store::CacheStore;
