//! Load Generator
//!
//! Drives a cache with concurrent readers and writers over a fixed key set,
//! picking keys at random, and reports the resulting statistics.

use std::sync::Barrier;
use std::thread;
use std::time::Instant;

use rand::Rng;
use tracing::info;

use crate::cache::{CacheStats, ExpireCache};
use crate::config::Config;

/// Key/value pairs the generator reads and writes.
pub const SAMPLE_ENTRIES: [(&str, &str); 8] = [
    ("1", "string 1"),
    ("2", "string 2"),
    ("3", "string 3"),
    ("4", "string 4"),
    ("10", "string 10"),
    ("100", "string 100"),
    ("1000", "string 1000"),
    ("10000", "string 10000"),
];

/// Shape of one load run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workload {
    pub readers: usize,
    pub writers: usize,
    /// Operations per thread
    pub operations: usize,
    /// TTL given to every write
    pub ttl_secs: i64,
}

impl Workload {
    pub fn from_config(config: &Config) -> Self {
        Self {
            readers: config.readers,
            writers: config.writers,
            operations: config.operations,
            ttl_secs: config.default_ttl,
        }
    }
}

/// Runs `workload` against `cache` and returns the cache statistics.
///
/// All threads are released together once every one of them has started.
/// Writers store values sized by their byte length.
pub fn run_workload(cache: &ExpireCache<String, String>, workload: &Workload) -> CacheStats {
    let threads = workload.readers + workload.writers;
    let start = Barrier::new(threads + 1);
    let started = Instant::now();

    thread::scope(|scope| {
        for _ in 0..workload.writers {
            scope.spawn(|| {
                start.wait();
                let mut rng = rand::thread_rng();
                for _ in 0..workload.operations {
                    let (key, value) = SAMPLE_ENTRIES[rng.gen_range(0..SAMPLE_ENTRIES.len())];
                    cache.set(
                        key.to_string(),
                        value.to_string(),
                        value.len() as u64,
                        workload.ttl_secs,
                    );
                }
            });
        }

        for _ in 0..workload.readers {
            scope.spawn(|| {
                start.wait();
                let mut rng = rand::thread_rng();
                for _ in 0..workload.operations {
                    let (key, _) = SAMPLE_ENTRIES[rng.gen_range(0..SAMPLE_ENTRIES.len())];
                    let _ = cache.get(&key.to_string());
                }
            });
        }

        start.wait();
    });

    let stats = cache.stats();
    info!(
        readers = workload.readers,
        writers = workload.writers,
        operations = workload.operations,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Workload finished"
    );
    stats
}
