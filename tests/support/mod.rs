//! Shared doubles for snippet cache integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use snipcache::application::repos::{
    RepoError, SnippetQueryFilter, SnippetsRepo, SnippetsWriteRepo, UpsertSnippetParams,
    UpsertTranslationParams,
};
use snipcache::application::snippets::SnippetService;
use snipcache::cache::{CacheBackend, CacheConfig, CacheEntry, CacheError, MemoryBackend, SnippetCache};
use snipcache::domain::entities::{SnippetRecord, TranslationRecord};
use snipcache::infra::memory::InMemorySnippets;

/// In-memory store that counts snippet lookups and can be taken offline.
#[derive(Default)]
pub struct CountingStore {
    inner: InMemorySnippets,
    lookups: AtomicUsize,
    offline: AtomicBool,
}

impl CountingStore {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RepoError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RepoError::Persistence("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SnippetsRepo for CountingStore {
    async fn find_snippet(&self, key: &str) -> Result<Option<SnippetRecord>, RepoError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.find_snippet(key).await
    }

    async fn list_translations(&self, key: &str) -> Result<Vec<TranslationRecord>, RepoError> {
        self.check()?;
        self.inner.list_translations(key).await
    }

    async fn list_snippets(
        &self,
        filter: &SnippetQueryFilter,
    ) -> Result<Vec<SnippetRecord>, RepoError> {
        self.check()?;
        self.inner.list_snippets(filter).await
    }
}

#[async_trait]
impl SnippetsWriteRepo for CountingStore {
    async fn upsert_snippet(&self, params: UpsertSnippetParams) -> Result<SnippetRecord, RepoError> {
        self.check()?;
        self.inner.upsert_snippet(params).await
    }

    async fn delete_snippet(&self, key: &str) -> Result<bool, RepoError> {
        self.check()?;
        self.inner.delete_snippet(key).await
    }

    async fn upsert_translation(
        &self,
        params: UpsertTranslationParams,
    ) -> Result<TranslationRecord, RepoError> {
        self.check()?;
        self.inner.upsert_translation(params).await
    }

    async fn delete_translation(&self, key: &str, language: &str) -> Result<bool, RepoError> {
        self.check()?;
        self.inner.delete_translation(key, language).await
    }
}

/// Backend whose every operation fails.
#[derive(Default)]
pub struct BrokenBackend {
    pub calls: AtomicUsize,
}

#[async_trait]
impl CacheBackend for BrokenBackend {
    async fn get(&self, _key: &str) -> Result<Option<CacheEntry>, CacheError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::unavailable("get refused"))
    }

    async fn set(&self, _key: &str, _entry: CacheEntry) -> Result<(), CacheError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::unavailable("set refused"))
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::unavailable("delete refused"))
    }
}

pub struct Harness {
    pub store: Arc<CountingStore>,
    pub backend: Arc<MemoryBackend>,
    pub cache: Arc<SnippetCache>,
    pub snippets: SnippetService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    pub fn with_config(config: CacheConfig) -> Self {
        let store = Arc::new(CountingStore::default());
        let backend = Arc::new(MemoryBackend::new(&config));
        let cache = Arc::new(SnippetCache::new(config, backend.clone(), store.clone()));
        let snippets = SnippetService::new(store.clone(), store.clone(), cache.clone());
        Self {
            store,
            backend,
            cache,
            snippets,
        }
    }

    /// Write directly to the store, bypassing the post-commit hook.
    pub async fn seed(&self, key: &str, text: &str, translations: &[(&str, &str)]) {
        self.store
            .inner
            .upsert_snippet(UpsertSnippetParams {
                key: key.to_string(),
                text: text.to_string(),
            })
            .await
            .expect("seed snippet");
        for (language, text) in translations {
            self.store
                .inner
                .upsert_translation(UpsertTranslationParams {
                    snippet_key: key.to_string(),
                    language: language.to_string(),
                    text: text.to_string(),
                })
                .await
                .expect("seed translation");
        }
    }

    pub async fn cached(&self, key: &str) -> Option<CacheEntry> {
        let cache_key = self.cache.config().cache_key(key);
        self.backend.get(&cache_key).await.expect("memory backend get")
    }
}
