//! expirecache - A size-bounded in-memory cache with per-entry TTL
//!
//! Entries are evicted in insertion order when the size bound is exceeded,
//! and reclaimed lazily on read or by a background sweeper once expired.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod tasks;
pub mod workload;

pub use cache::{CacheStats, ExpireCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::{spawn_cleaner, CleanerHandle};
