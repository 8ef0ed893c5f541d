//! Cache Store Module
//!
//! In-memory TTL store keyed by the fixed [`CacheKey`] enumeration.

use std::collections::HashMap;

use crate::cache::{CacheEntry, CacheKey, CacheStats};

// == Cache Store ==
/// Holds one serialized payload per [`CacheKey`], each with its own expiry.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: HashMap<CacheKey, CacheEntry>,
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty CacheStore.
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores a payload under `key`, replacing any previous one and resetting its TTL.
    pub fn set(&mut self, key: CacheKey, value: String, ttl_seconds: u64) {
        self.entries.insert(key, CacheEntry::new(value, ttl_seconds));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the payload if present and not expired.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: CacheKey) -> Option<String> {
        match self.entries.get(&key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(&key);
                self.stats.record_expirations(1);
                self.stats.set_total_entries(self.entries.len());
                self.stats.record_miss();
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Clear ==
    /// Removes the entry under `key`. Returns whether an entry was removed.
    pub fn clear(&mut self, key: CacheKey) -> bool {
        let removed = self.entries.remove(&key).is_some();
        if removed {
            self.stats.record_invalidation();
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == TTL Remaining ==
    /// Remaining TTL in seconds of a live entry.
    pub fn ttl_remaining(&self, key: CacheKey) -> Option<u64> {
        self.entries
            .get(&key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::ttl_remaining)
    }

    // == Stats ==
    /// Returns a snapshot of the statistics with a fresh entry count.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let count = before - self.entries.len();

        self.stats.record_expirations(count);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Size ==
    /// Returns the number of entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
