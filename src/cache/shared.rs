//! Shared cache handle
//!
//! Wraps a [`CacheStore`] in `Arc<RwLock<>>` so the catalog, the HTTP
//! handlers and the cleanup task can all reach the same store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheBackend, CacheKey, CacheStats, CacheStore};
use crate::error::Result;

/// Process-local [`CacheBackend`] over a shared [`CacheStore`].
#[derive(Debug, Clone, Default)]
pub struct SharedCache {
    store: Arc<RwLock<CacheStore>>,
}

impl SharedCache {
    /// Creates a handle over a fresh, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying store, for the TTL cleanup task.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        Arc::clone(&self.store)
    }

    /// Snapshot of the store's statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Remaining TTL in seconds of a live entry.
    pub async fn ttl_remaining(&self, key: CacheKey) -> Option<u64> {
        self.store.read().await.ttl_remaining(key)
    }
}

#[async_trait]
impl CacheBackend for SharedCache {
    async fn get(&self, key: CacheKey) -> Result<Option<String>> {
        // Write lock: an expired entry is removed on read
        let mut store = self.store.write().await;
        Ok(store.get(key))
    }

    async fn set(&self, key: CacheKey, value: String, ttl_seconds: u64) -> Result<()> {
        debug!("Caching {} ({} bytes, ttl {}s)", key, value.len(), ttl_seconds);
        self.store.write().await.set(key, value, ttl_seconds);
        Ok(())
    }

    async fn clear(&self, key: CacheKey) -> Result<()> {
        if self.store.write().await.clear(key) {
            debug!("Cleared cache entry {}", key);
        }
        Ok(())
    }
}
