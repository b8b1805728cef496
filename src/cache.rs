//! Process-local loading caches
//!
//! Unbounded, load-on-miss caches keyed by agent id. Entries never expire; they are
//! dropped only by [`LoadingCache::invalidate`], which every mutating directory
//! operation calls before returning. A miss that found nothing is cached too, so
//! repeated lookups of a deleted agent cost one backend read.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entry_count: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Load-on-miss cache memoizing both present and absent values
pub struct LoadingCache<V> {
    name: &'static str,
    entries: RwLock<HashMap<String, Option<V>>>,
    /// Bumped on every invalidation; a load that straddles one is not stored
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> LoadingCache<V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached entry or run `load` and cache its result.
    ///
    /// Concurrent misses for one key may each call `load`; the last to finish wins.
    /// Errors from `load` are returned and never cached.
    pub fn get_or_try_load<E, F>(&self, key: &str, load: F) -> Result<Option<V>, E>
    where
        F: FnOnce() -> Result<Option<V>, E>,
    {
        if let Some(entry) = self.entries.read().get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(entry.clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let generation = self.generation.load(Ordering::Acquire);
        let loaded = load()?;

        let mut entries = self.entries.write();
        if self.generation.load(Ordering::Acquire) == generation {
            entries.insert(key.to_string(), loaded.clone());
        } else {
            trace!(cache = self.name, key, "Discarding load that raced an invalidation");
        }
        Ok(loaded)
    }

    /// Drop the entry for `key`
    pub fn invalidate(&self, key: &str) {
        let mut entries = self.entries.write();
        self.generation.fetch_add(1, Ordering::AcqRel);
        entries.remove(key);
        trace!(cache = self.name, key, "Invalidated cache entry");
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
