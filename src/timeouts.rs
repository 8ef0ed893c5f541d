//! Per-call deadlines for store I/O
//!
//! Every call into the primary store, the cache or the search index is
//! bounded. An elapsed deadline becomes the error kind of the store that
//! was being called.

use std::future::Future;
use std::time::Duration;

use crate::error::{CatalogError, Result};

/// Bounds a primary store call; a timeout is a `Store` failure.
pub async fn primary<T, F>(limit: Duration, operation: &str, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(CatalogError::Store(format!(
            "{} timed out after {}ms",
            operation,
            limit.as_millis()
        ))),
    }
}

/// Bounds a cache or index call; a timeout is a `DerivedStore` failure.
pub async fn derived<T, F>(limit: Duration, operation: &str, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(CatalogError::DerivedStore(format!(
            "{} timed out after {}ms",
            operation,
            limit.as_millis()
        ))),
    }
}
