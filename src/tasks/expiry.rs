//! Active Expiry Task
//!
//! Background task that periodically removes expired keys from a memory
//! store. Reads already hide expired keys; this bounds how long they keep
//! occupying memory when nobody touches them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::executor::memory::MemoryStore;

/// Spawns a background task that periodically purges expired keys.
///
/// # Arguments
/// * `store` - Shared store, usually from `MemoryExecutor::store`
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task; abort it to stop sweeping.
///
/// # Example
/// ```ignore
/// let executor = MemoryExecutor::new();
/// let sweeper = spawn_expiry_task(executor.store(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_expiry_task(store: Arc<RwLock<MemoryStore>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting expiry task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut store_guard = store.write().await;
                store_guard.cleanup_expired()
            };

            if removed > 0 {
                info!("Expiry sweep: removed {} expired keys", removed);
            } else {
                debug!("Expiry sweep: no expired keys found");
            }
        }
    })
}
