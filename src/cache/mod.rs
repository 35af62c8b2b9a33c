//! Snippet cache system.
//!
//! A cache-aside layer in front of the snippet store:
//!
//! - **Reads** consult the [`CacheBackend`] first and fill it on a miss with
//!   either the snippet's [`SnippetView`](crate::domain::snippets::SnippetView)
//!   or the negative marker [`CacheEntry::Missing`].
//! - **Writes** are reported through
//!   [`SnippetWriteHook`](crate::application::snippets::SnippetWriteHook);
//!   the cache rebuilds the whole view or evicts it.
//!
//! Backend failures never reach readers; they are logged, counted and
//! bypassed.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! capacity = 10000
//! key_prefix = "snippet:"
//! fallback_to_base_language = false
//! ```

mod backend;
mod config;
mod keys;
mod lock;
mod resolver;
mod store;

pub use backend::{CacheBackend, CacheEntry, CacheError, DisabledBackend};
pub use config::CacheConfig;
pub use keys::{DEFAULT_KEY_PREFIX, KeyPrefix, escape_key};
pub use resolver::{SnippetCache, SnippetCacheError};
pub use store::MemoryBackend;

pub(crate) const METRIC_CACHE_HIT: &str = "snipcache_cache_hit_total";
pub(crate) const METRIC_CACHE_NEGATIVE_HIT: &str = "snipcache_cache_negative_hit_total";
pub(crate) const METRIC_CACHE_MISS: &str = "snipcache_cache_miss_total";
pub(crate) const METRIC_CACHE_BYPASS: &str = "snipcache_cache_bypass_total";
pub(crate) const METRIC_CACHE_EVICT: &str = "snipcache_cache_evict_total";
