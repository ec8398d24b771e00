//! expirecache - A size-bounded in-memory cache with per-entry TTL
//!
//! Runs the load generator against a cache with its expiration sweeper
//! attached, then prints the final statistics.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use expirecache::workload::{run_workload, Workload};
use expirecache::{spawn_cleaner, Config, ExpireCache};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache and start its expiration sweeper
/// 4. Run the load generator on blocking threads
/// 5. Print statistics as JSON and stop the sweeper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expirecache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: max_size={}, cleanup_interval={}s, readers={}, writers={}, operations={}",
        config.max_size, config.cleanup_interval, config.readers, config.writers, config.operations
    );

    let cache: ExpireCache<String, String> = ExpireCache::new(config.max_size);
    let cleaner = spawn_cleaner(cache.clone(), config.cleanup_interval());

    let workload = Workload::from_config(&config);
    let stats = {
        let cache = cache.clone();
        tokio::task::spawn_blocking(move || run_workload(&cache, &workload)).await?
    };

    println!("{}", serde_json::to_string_pretty(&stats)?);
    info!("Hit rate: {:.2}%", stats.hit_rate() * 100.0);

    cleaner.stop().await?;
    info!("Shutdown complete");
    Ok(())
}
