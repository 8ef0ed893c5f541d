//! Staleness signal
//!
//! Derived-store failures never fail a mutation whose primary write
//! succeeded. They are logged and counted here instead, so operators can
//! see that the cache or the index may lag the primary store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::error::CatalogError;

/// Which derived store failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DerivedStore {
    Cache,
    SearchIndex,
}

/// The most recent swallowed failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaleEvent {
    pub store: DerivedStore,
    pub operation: String,
    pub error: String,
    pub at: DateTime<Utc>,
}

/// Snapshot of the staleness counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StalenessReport {
    pub cache_failures: u64,
    pub index_failures: u64,
    pub last_failure: Option<StaleEvent>,
}

impl StalenessReport {
    pub fn total_failures(&self) -> u64 {
        self.cache_failures + self.index_failures
    }
}

#[derive(Debug, Default)]
pub struct StalenessMonitor {
    cache_failures: AtomicU64,
    index_failures: AtomicU64,
    last_failure: Mutex<Option<StaleEvent>>,
}

impl StalenessMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs and counts a derived-store failure.
    pub fn record(&self, store: DerivedStore, operation: &str, error: &CatalogError) {
        warn!(
            "{:?} {} failed, continuing with possibly stale state: {}",
            store, operation, error
        );

        let counter = match store {
            DerivedStore::Cache => &self.cache_failures,
            DerivedStore::SearchIndex => &self.index_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        let event = StaleEvent {
            store,
            operation: operation.to_string(),
            error: error.to_string(),
            at: Utc::now(),
        };
        let mut last = self
            .last_failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *last = Some(event);
    }

    pub fn report(&self) -> StalenessReport {
        let last_failure = self
            .last_failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        StalenessReport {
            cache_failures: self.cache_failures.load(Ordering::Relaxed),
            index_failures: self.index_failures.load(Ordering::Relaxed),
            last_failure,
        }
    }
}
