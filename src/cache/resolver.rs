//! Cache-aside coordinator between template callers and the snippet store.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::repos::{RepoError, SnippetsRepo};
use crate::application::snippets::SnippetWriteHook;
use crate::domain::snippets::SnippetView;

use super::backend::{CacheBackend, CacheEntry, CacheError};
use super::config::CacheConfig;
use super::{
    METRIC_CACHE_BYPASS, METRIC_CACHE_HIT, METRIC_CACHE_MISS, METRIC_CACHE_NEGATIVE_HIT,
};

/// The only failure a reader can observe.
///
/// A missing snippet is `Ok(None)`, and backend failures are absorbed.
#[derive(Debug, Error)]
pub enum SnippetCacheError {
    #[error("snippet store unavailable: {0}")]
    StoreUnavailable(#[from] RepoError),
}

/// Serves snippet text from the cache backend, filling it from the store.
///
/// Holds no mutable state of its own. Concurrent misses for the same key may
/// each query the store and populate the backend; both write the same view.
/// A fill racing a concurrent [`refresh`](Self::refresh) can leave the older
/// view cached until the next write or eviction.
pub struct SnippetCache {
    config: CacheConfig,
    backend: Arc<dyn CacheBackend>,
    store: Arc<dyn SnippetsRepo>,
}

impl SnippetCache {
    pub fn new(
        config: CacheConfig,
        backend: Arc<dyn CacheBackend>,
        store: Arc<dyn SnippetsRepo>,
    ) -> Self {
        Self {
            config,
            backend,
            store,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Text of snippet `key` for `language`, or the default text.
    ///
    /// Returns `Ok(None)` when the snippet does not exist or has no text for
    /// either language. `key` is looked up exactly as given; writes trim
    /// keys, so `" greeting "` is a different (and absent) snippet from
    /// `"greeting"` and gets its own negative marker.
    pub async fn resolve_text(
        &self,
        key: &str,
        language: &str,
    ) -> Result<Option<String>, SnippetCacheError> {
        let view = self.view(key).await?;
        Ok(view.and_then(|view| {
            view.resolve(language, self.config.fallback_to_base_language)
                .map(str::to_owned)
        }))
    }

    /// Every language of snippet `key`, read through the cache.
    pub async fn view(&self, key: &str) -> Result<Option<SnippetView>, SnippetCacheError> {
        let cache_key = self.config.cache_key(key);

        match self.backend.get(&cache_key).await {
            Ok(Some(CacheEntry::Missing)) => {
                counter!(METRIC_CACHE_NEGATIVE_HIT).increment(1);
                return Ok(None);
            }
            Ok(Some(CacheEntry::View(view))) => {
                counter!(METRIC_CACHE_HIT).increment(1);
                return Ok(Some(view));
            }
            Ok(None) => {
                counter!(METRIC_CACHE_MISS).increment(1);
            }
            Err(err) => self.bypass("get", &cache_key, &err),
        }

        let view = self.load_view(key).await.map_err(|err| {
            warn!(key, error = %err, "Snippet store lookup failed; nothing cached");
            SnippetCacheError::StoreUnavailable(err)
        })?;

        match view {
            Some(view) => {
                debug!(key, cache_key = %cache_key, "Filled snippet cache entry");
                self.store_entry(&cache_key, CacheEntry::View(view.clone()))
                    .await;
                Ok(Some(view))
            }
            None => {
                debug!(key, cache_key = %cache_key, "Cached negative marker for snippet");
                self.store_entry(&cache_key, CacheEntry::Missing).await;
                Ok(None)
            }
        }
    }

    /// Rebuild the cached view of `key` from the store.
    ///
    /// The entry is replaced wholesale. When the snippet is gone the entry is
    /// evicted; when the store cannot be read the entry is evicted as well
    /// and the error returned.
    pub async fn refresh(&self, key: &str) -> Result<(), SnippetCacheError> {
        let cache_key = self.config.cache_key(key);

        match self.load_view(key).await {
            Ok(Some(view)) => {
                self.store_entry(&cache_key, CacheEntry::View(view)).await;
                Ok(())
            }
            Ok(None) => {
                self.invalidate(key).await;
                Ok(())
            }
            Err(err) => {
                self.invalidate(key).await;
                Err(SnippetCacheError::StoreUnavailable(err))
            }
        }
    }

    /// Drop the cached entry for `key`; the next read goes to the store.
    pub async fn invalidate(&self, key: &str) {
        let cache_key = self.config.cache_key(key);
        if let Err(err) = self.backend.delete(&cache_key).await {
            self.bypass("delete", &cache_key, &err);
        }
    }

    async fn load_view(&self, key: &str) -> Result<Option<SnippetView>, RepoError> {
        let Some(snippet) = self.store.find_snippet(key).await? else {
            return Ok(None);
        };
        let translations = self.store.list_translations(key).await?;
        Ok(Some(SnippetView::build(&snippet, &translations)))
    }

    async fn store_entry(&self, cache_key: &str, entry: CacheEntry) {
        if let Err(err) = self.backend.set(cache_key, entry).await {
            self.bypass("set", cache_key, &err);
        }
    }

    fn bypass(&self, op: &'static str, cache_key: &str, err: &CacheError) {
        counter!(METRIC_CACHE_BYPASS).increment(1);
        warn!(op, cache_key, error = %err, "Snippet cache backend failed; bypassing");
    }
}

#[async_trait]
impl SnippetWriteHook for SnippetCache {
    async fn snippet_written(&self, key: &str) {
        if let Err(err) = self.refresh(key).await {
            warn!(key, error = %err, "Snippet cache rebuild failed; entry evicted");
        }
    }

    async fn snippet_deleted(&self, key: &str) {
        self.invalidate(key).await;
    }
}
