//! Background Tasks Module
//!
//! # Tasks
//! - Expiration sweep: removes expired cache entries at a fixed interval

mod cleanup;

pub use cleanup::{spawn_cleaner, spawn_cleaner_with_timer, CleanerHandle};
