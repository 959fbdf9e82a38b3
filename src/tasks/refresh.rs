//! Display Refresh Task
//!
//! Background task that periodically polls the engine so a display of its
//! size stays current while entries expire.
//!
//! The poll only calls `size()`, which sweeps expired entries; it never
//! writes a snapshot or changes recency.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheEngine;

/// Spawns a background task that polls the engine every `interval_ms`.
///
/// Logs at `info` whenever the live size changed since the previous poll.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let engine = Arc::new(Mutex::new(CacheEngine::in_memory(CacheConfig::default())?));
/// let refresh_handle = spawn_refresh_task(engine.clone(), 500);
/// // Later, during shutdown:
/// refresh_handle.abort();
/// ```
pub fn spawn_refresh_task(engine: Arc<Mutex<CacheEngine>>, interval_ms: u64) -> JoinHandle<()> {
    let interval = Duration::from_millis(interval_ms.max(1));

    tokio::spawn(async move {
        info!("Starting display refresh task with interval of {} ms", interval_ms);

        let mut last_size = None;
        loop {
            tokio::time::sleep(interval).await;

            let size = {
                let mut guard = engine.lock().await;
                guard.size()
            };

            if last_size != Some(size) {
                info!("Cache size: {} live entries", size);
                last_size = Some(size);
            } else {
                debug!("Display refresh: size unchanged at {}", size);
            }
        }
    })
}
