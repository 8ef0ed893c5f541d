//! Catalog Module
//!
//! The consistency orchestrator. Every operation goes to the primary store
//! first for its authoritative result; the list cache and the search index
//! are brought in line around that call.
//!
//! # Ordering
//! - create / delete: primary write, then cache invalidation, then index
//! - product update: cache invalidation, primary write, then index
//!
//! # Failure policy
//! - Primary store failures abort the operation and reach the caller.
//! - Cache and index failures on a mutation are logged and recorded in the
//!   [`StalenessMonitor`]; the primary result is still returned.
//! - A failed or undecodable cache read is a miss.
//!
//! # Fill races
//! A list read from the primary store is cached only if no invalidation of
//! its key happened while the read was in flight; see [`Generations`].

mod categories;
mod generations;
mod products;
mod staleness;
mod users;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cache::{CacheBackend, CacheKey, CACHE_TTL_SECS};
use crate::error::{CatalogError, Result};
use crate::search::SearchIndex;
use crate::store::EntityStore;
use crate::timeouts;
use crate::validator::ReferentialValidator;

use generations::Generations;

pub use staleness::{DerivedStore, StaleEvent, StalenessMonitor, StalenessReport};

/// Lists that embed products: both must go when a product changes.
const PRODUCT_VIEWS: &[CacheKey] = &[CacheKey::AllProducts, CacheKey::AllUsers];

/// Orchestrates the primary store, the list cache and the search index.
pub struct Catalog {
    store: Arc<dyn EntityStore>,
    cache: Arc<dyn CacheBackend>,
    index: Arc<dyn SearchIndex>,
    validator: ReferentialValidator,
    staleness: StalenessMonitor,
    generations: Generations,
    io_timeout: Duration,
}

impl Catalog {
    pub fn new(
        store: Arc<dyn EntityStore>,
        cache: Arc<dyn CacheBackend>,
        index: Arc<dyn SearchIndex>,
        io_timeout: Duration,
    ) -> Self {
        let validator = ReferentialValidator::new(Arc::clone(&store), io_timeout);
        Self {
            store,
            cache,
            index,
            validator,
            staleness: StalenessMonitor::new(),
            generations: Generations::new(),
            io_timeout,
        }
    }

    /// Swallowed derived-store failures so far.
    pub fn staleness(&self) -> StalenessReport {
        self.staleness.report()
    }

    async fn primary<T, F>(&self, operation: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        timeouts::primary(self.io_timeout, operation, call).await
    }

    // == Cache helpers ==

    /// Reads and decodes a cached list; `None` on miss, failure or bad payload.
    async fn cached_list<T: DeserializeOwned>(&self, key: CacheKey) -> Option<Vec<T>> {
        let read = timeouts::derived(self.io_timeout, "cache read", self.cache.get(key)).await;
        let payload = match read {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!("Cache miss for {}", key);
                return None;
            }
            Err(err) => {
                self.staleness
                    .record(DerivedStore::Cache, &format!("get {}", key), &err);
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(items) => {
                debug!("Cache hit for {}", key);
                Some(items)
            }
            Err(err) => {
                let err = CatalogError::from(err);
                self.staleness
                    .record(DerivedStore::Cache, &format!("decode {}", key), &err);
                None
            }
        }
    }

    /// Serializes a freshly queried list into the cache.
    async fn fill_cache<T: Serialize>(&self, key: CacheKey, items: &[T]) {
        let payload = match serde_json::to_string(items) {
            Ok(payload) => payload,
            Err(err) => {
                let err = CatalogError::from(err);
                self.staleness
                    .record(DerivedStore::Cache, &format!("encode {}", key), &err);
                return;
            }
        };

        let write = self.cache.set(key, payload, CACHE_TTL_SECS);
        if let Err(err) = timeouts::derived(self.io_timeout, "cache write", write).await {
            self.staleness
                .record(DerivedStore::Cache, &format!("set {}", key), &err);
        }
    }

    /// Clears each key; failures are recorded and the remaining keys still cleared.
    ///
    /// The generation moves before the clear, so a reader that fills after
    /// the clear still notices it.
    async fn invalidate(&self, keys: &[CacheKey]) {
        for &key in keys {
            self.generations.bump(key);
            self.clear_key(key).await;
        }
    }

    async fn clear_key(&self, key: CacheKey) {
        let clear = timeouts::derived(self.io_timeout, "cache clear", self.cache.clear(key));
        if let Err(err) = clear.await {
            self.staleness
                .record(DerivedStore::Cache, &format!("clear {}", key), &err);
        }
    }

    // == Index helper ==

    async fn sync_index<F>(&self, operation: &str, call: F)
    where
        F: Future<Output = Result<()>>,
    {
        if let Err(err) = timeouts::derived(self.io_timeout, operation, call).await {
            self.staleness.record(DerivedStore::SearchIndex, operation, &err);
        }
    }

    /// Reads through the cache for an unkeyed list query.
    async fn read_through<T, F>(&self, key: CacheKey, operation: &str, query: F) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<Vec<T>>>,
    {
        if let Some(items) = self.cached_list(key).await {
            return Ok(items);
        }

        let seen = self.generations.current(key);
        let items = self.primary(operation, query).await?;
        if self.generations.moved_since(key, seen) {
            debug!("Not caching {}: invalidated during the read", key);
            return Ok(items);
        }

        self.fill_cache(key, &items).await;
        if self.generations.moved_since(key, seen) {
            // an invalidation landed between the check and the write
            debug!("Dropping {} fill raced by an invalidation", key);
            self.clear_key(key).await;
        }
        Ok(items)
    }
}
