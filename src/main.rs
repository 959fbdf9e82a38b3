//! TTL LRU Cache - interactive host
//!
//! Runs a cache engine backed by a snapshot file and drives it from a
//! line-oriented shell on stdin/stdout.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::BufReader;
use tokio::signal;
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_lru_cache::cache::{CacheEngine, SystemClock, TracingSink};
use ttl_lru_cache::persistence::FileStore;
use ttl_lru_cache::{shell, spawn_refresh_task, Config};

/// Main entry point for the cache shell.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr, so replies on
///    stdout stay machine-readable)
/// 2. Load configuration from environment variables
/// 3. Open the snapshot directory and build the engine, loading any snapshot
/// 4. Start the display refresh task
/// 5. Run the shell until `quit`, end of input, or Ctrl+C
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_lru_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting TTL LRU cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_size={}, default_ttl_ms={}, storage_key={}, storage_dir={:?}, refresh_interval_ms={}",
        config.cache.max_size,
        config.cache.default_ttl_ms,
        config.cache.storage_key,
        config.storage_dir,
        config.refresh_interval_ms
    );

    let store = FileStore::new(&config.storage_dir)
        .with_context(|| format!("failed to open storage directory {:?}", config.storage_dir))?;
    let engine = CacheEngine::new(
        config.cache.clone(),
        store,
        Arc::new(SystemClock::new()),
        TracingSink,
    )
    .context("invalid cache configuration")?;
    let engine = Arc::new(Mutex::new(engine));
    info!("Cache engine initialized");

    let refresh_handle = spawn_refresh_task(engine.clone(), config.refresh_interval_ms);

    let input = BufReader::new(tokio::io::stdin());
    let output = tokio::io::stdout();

    tokio::select! {
        result = shell::run(engine.clone(), input, output) => {
            result.context("shell I/O failed")?;
            info!("Input closed, shutting down");
        }
        _ = shutdown_signal() => {}
    }

    refresh_handle.abort();
    warn!("Display refresh task aborted");

    let stats = engine.lock().await.stats();
    info!(
        "Shutdown complete: {} entries resident, {} hits, {} misses",
        stats.total_entries, stats.hits, stats.misses
    );
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
