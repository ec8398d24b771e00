//! Expiration Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::hash::Hash;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::ExpireCache;
use crate::clock::{SweepTimer, TokioTimer};
use crate::error::Result;

/// Handle to a running sweeper.
///
/// Dropping the handle also stops the sweeper, at its next wake-up.
#[derive(Debug)]
pub struct CleanerHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl CleanerHandle {
    /// Signals the sweeper to stop and waits for it to exit.
    ///
    /// A sweep cycle already in progress finishes first.
    pub async fn stop(mut self) -> Result<()> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.task.await?;
        Ok(())
    }

    /// Cancels the sweeper without waiting.
    pub fn abort(&self) {
        self.task.abort();
        warn!("Expiration sweeper aborted");
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns the sweeper for `cache` on the tokio timer.
///
/// # Example
/// ```ignore
/// let cache: ExpireCache<String, String> = ExpireCache::new(1024);
/// let cleaner = spawn_cleaner(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// cleaner.stop().await?;
/// ```
pub fn spawn_cleaner<K, V>(cache: ExpireCache<K, V>, interval: Duration) -> CleanerHandle
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    spawn_cleaner_with_timer(cache, interval, TokioTimer)
}

/// Spawns the sweeper for `cache`, paced by `timer`.
///
/// Each cycle sleeps for `interval` with no lock held, sweeps every entry
/// under the cache lock, releases it, then calls `timer.after_sweep()`.
pub fn spawn_cleaner_with_timer<K, V, T>(
    cache: ExpireCache<K, V>,
    interval: Duration,
    timer: T,
) -> CleanerHandle
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
    T: SweepTimer + 'static,
{
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        info!(
            "Starting expiration sweeper with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::select! {
                // Fires on an explicit stop and when the handle is dropped
                _ = &mut stop_rx => break,
                _ = timer.sleep(interval) => {}
            }

            let removed = cache.sweep_expired();

            if removed > 0 {
                info!("Expiration sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiration sweep: no expired entries found");
            }

            timer.after_sweep().await;
        }

        info!("Expiration sweeper stopped");
    });

    CleanerHandle {
        stop: Some(stop_tx),
        task,
    }
}
