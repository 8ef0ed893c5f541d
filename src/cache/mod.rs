//! Cache Module
//!
//! Read-through list cache with TTL expiration. The cache only knows a fixed
//! set of aggregate views ([`CacheKey`]) and treats payloads as opaque text;
//! the catalog owns serialization.

mod entry;
mod shared;
mod stats;
mod store;


use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Time-to-live applied to every cache entry (30 minutes)
pub const CACHE_TTL_SECS: u64 = 1800;

// == Cache Key ==
/// The named aggregate views that may be cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CacheKey {
    /// Every product, with category and owner loaded
    AllProducts,
    /// Every user, with its products loaded
    AllUsers,
}

impl CacheKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::AllProducts => "all_products",
            CacheKey::AllUsers => "all_users",
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Cache Backend ==
/// Key/value store with expiration used for list caching.
///
/// Failures are reported, never hidden; the catalog decides that a failed
/// read is a miss and a failed clear is accepted staleness.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: CacheKey) -> Result<Option<String>>;

    async fn set(&self, key: CacheKey, value: String, ttl_seconds: u64) -> Result<()>;

    async fn clear(&self, key: CacheKey) -> Result<()>;
}
