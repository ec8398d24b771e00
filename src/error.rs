//! Error types for the cache
//!
//! Cache operations themselves never fail; errors come only from the
//! surroundings: configuration and the background sweeper.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum CacheError {
    /// An environment variable held a value that could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The sweeper task panicked or was cancelled before it could be joined
    #[error("Cleaner task failed: {0}")]
    Cleaner(String),
}

impl From<tokio::task::JoinError> for CacheError {
    fn from(err: tokio::task::JoinError) -> Self {
        CacheError::Cleaner(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
