//! Invalidation generations
//!
//! One counter per cached list. Every invalidation bumps the counter of its
//! key; a reader that saw the counter move while it was querying the primary
//! store holds a snapshot older than that invalidation and must not cache it.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::cache::CacheKey;

#[derive(Debug, Default)]
pub(crate) struct Generations {
    products: AtomicU64,
    users: AtomicU64,
}

impl Generations {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn counter(&self, key: CacheKey) -> &AtomicU64 {
        match key {
            CacheKey::AllProducts => &self.products,
            CacheKey::AllUsers => &self.users,
        }
    }

    pub(crate) fn current(&self, key: CacheKey) -> u64 {
        self.counter(key).load(Ordering::SeqCst)
    }

    pub(crate) fn bump(&self, key: CacheKey) {
        self.counter(key).fetch_add(1, Ordering::SeqCst);
    }

    /// True once `key` has been invalidated since `seen` was read.
    pub(crate) fn moved_since(&self, key: CacheKey, seen: u64) -> bool {
        self.current(key) != seen
    }
}
