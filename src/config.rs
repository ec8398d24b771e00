//! Configuration Module
//!
//! Loads cache and load-generator settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Runtime configuration.
///
/// Unset variables fall back to the defaults; set but unparseable ones are
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Capacity in entry-size units, 0 = unbounded
    pub max_size: u64,
    /// Seconds between expiration sweeps
    pub cleanup_interval: u64,
    /// TTL in seconds given to entries written by the load generator
    pub default_ttl: i64,
    /// Number of reader threads in the load generator
    pub readers: usize,
    /// Number of writer threads in the load generator
    pub writers: usize,
    /// Operations performed by each load-generator thread
    pub operations: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_SIZE` - Cache capacity (default: 0, unbounded)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `DEFAULT_TTL` - Entry TTL in seconds (default: 60)
    /// - `READERS` - Reader threads (default: 10)
    /// - `WRITERS` - Writer threads (default: 2)
    /// - `OPERATIONS` - Operations per thread (default: 100000)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            max_size: env_or("MAX_SIZE", defaults.max_size)?,
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval)?,
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl)?,
            readers: env_or("READERS", defaults.readers)?,
            writers: env_or("WRITERS", defaults.writers)?,
            operations: env_or("OPERATIONS", defaults.operations)?,
        })
    }

    /// Interval between expiration sweeps.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_size: 0,
            cleanup_interval: 60,
            default_ttl: 60,
            readers: 10,
            writers: 2,
            operations: 100_000,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CacheError::InvalidConfig(format!("{}={:?}", name, raw))),
        Err(_) => Ok(default),
    }
}
