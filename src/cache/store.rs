//! In-process cache backend.
//!
//! Bounded by an LRU; evictions are only a performance concern since every
//! entry can be rebuilt from the snippet store.

use std::sync::RwLock;

use async_trait::async_trait;
use lru::LruCache;
use metrics::counter;
use tracing::trace;

use super::backend::{CacheBackend, CacheEntry, CacheError};
use super::config::CacheConfig;
use super::lock::{rw_read, rw_write};
use super::METRIC_CACHE_EVICT;

const SOURCE: &str = "cache::store";

/// LRU-bounded backend living inside the process.
pub struct MemoryBackend {
    entries: RwLock<LruCache<String, CacheEntry>>,
}

impl MemoryBackend {
    /// Create a new backend sized by `config.capacity`.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.capacity_non_zero())),
        }
    }

    /// Get the number of cached entries.
    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all cached entries.
    pub fn clear(&self) {
        rw_write(&self.entries, SOURCE, "clear").clear();
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(rw_write(&self.entries, SOURCE, "get").get(key).cloned())
    }

    async fn set(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        let evicted = rw_write(&self.entries, SOURCE, "set").push(key.to_string(), entry);
        if let Some((evicted_key, _)) = evicted {
            // `push` hands back the old value when the key was already present.
            if evicted_key != key {
                counter!(METRIC_CACHE_EVICT).increment(1);
                trace!(evicted = %evicted_key, "Evicted snippet cache entry");
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        rw_write(&self.entries, SOURCE, "delete").pop(key);
        Ok(())
    }
}
