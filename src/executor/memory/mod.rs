//! In-Memory Executor
//!
//! An in-process keyspace with the store's command semantics: strings,
//! lists, hashes and sorted sets, TTL expiration and `WRONGTYPE` errors.
//! Useful for tests and for running a `Cacher` without a server.

mod commands;
mod entry;
mod pattern;
mod store;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Command, Executor, Reply};
use crate::error::TransportError;

pub use entry::{CacheEntry, StoredValue};
pub use store::{MemoryStore, StoreError};

/// Executor over a shared [`MemoryStore`].
///
/// Clones share the same keyspace. Every command runs under the write lock,
/// so each command is atomic with respect to the others.
#[derive(Debug, Clone, Default)]
pub struct MemoryExecutor {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryExecutor {
    /// Creates an executor over an empty keyspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared store, e.g. for [`spawn_expiry_task`](crate::tasks::spawn_expiry_task).
    pub fn store(&self) -> Arc<RwLock<MemoryStore>> {
        Arc::clone(&self.store)
    }
}

#[async_trait]
impl Executor for MemoryExecutor {
    async fn execute(&self, command: Command) -> Result<Reply, TransportError> {
        // Write lock even for reads: lookups drop expired keys
        let mut store = self.store.write().await;
        Ok(commands::execute(&mut store, &command))
    }
}
