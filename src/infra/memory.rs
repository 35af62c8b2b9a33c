//! In-process snippet store.
//!
//! Implements the same repository traits as the Postgres adapter, including
//! cascading translation deletes. Used for tests and for embedding without a
//! database.

use std::collections::BTreeMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::application::repos::{
    RepoError, SnippetQueryFilter, SnippetsRepo, SnippetsWriteRepo, UpsertSnippetParams,
    UpsertTranslationParams,
};
use crate::domain::entities::{SnippetRecord, TranslationRecord};

const DEFAULT_LIST_LIMIT: u32 = 100;

struct StoredSnippet {
    record: SnippetRecord,
    translations: BTreeMap<String, TranslationRecord>,
}

#[derive(Default)]
pub struct InMemorySnippets {
    snippets: RwLock<BTreeMap<String, StoredSnippet>>,
}

impl InMemorySnippets {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnippetsRepo for InMemorySnippets {
    async fn find_snippet(&self, key: &str) -> Result<Option<SnippetRecord>, RepoError> {
        let guard = self.snippets.read().await;
        Ok(guard.get(key).map(|stored| stored.record.clone()))
    }

    async fn list_translations(&self, key: &str) -> Result<Vec<TranslationRecord>, RepoError> {
        let guard = self.snippets.read().await;
        Ok(guard
            .get(key)
            .map(|stored| stored.translations.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn list_snippets(
        &self,
        filter: &SnippetQueryFilter,
    ) -> Result<Vec<SnippetRecord>, RepoError> {
        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase);
        let limit = filter.limit.unwrap_or(DEFAULT_LIST_LIMIT).max(1) as usize;

        let guard = self.snippets.read().await;
        Ok(guard
            .values()
            .map(|stored| &stored.record)
            .filter(|record| match needle.as_deref() {
                Some(needle) => {
                    record.key.to_lowercase().contains(needle)
                        || record.text.to_lowercase().contains(needle)
                }
                None => true,
            })
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SnippetsWriteRepo for InMemorySnippets {
    async fn upsert_snippet(&self, params: UpsertSnippetParams) -> Result<SnippetRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let mut guard = self.snippets.write().await;

        let stored = guard
            .entry(params.key.clone())
            .or_insert_with(|| StoredSnippet {
                record: SnippetRecord {
                    key: params.key.clone(),
                    text: String::new(),
                    created_at: now,
                    updated_at: now,
                },
                translations: BTreeMap::new(),
            });
        stored.record.text = params.text;
        stored.record.updated_at = now;

        Ok(stored.record.clone())
    }

    async fn delete_snippet(&self, key: &str) -> Result<bool, RepoError> {
        let mut guard = self.snippets.write().await;
        Ok(guard.remove(key).is_some())
    }

    async fn upsert_translation(
        &self,
        params: UpsertTranslationParams,
    ) -> Result<TranslationRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let mut guard = self.snippets.write().await;

        let stored = guard
            .get_mut(&params.snippet_key)
            .ok_or(RepoError::NotFound)?;
        stored.record.updated_at = now;

        let translation = stored
            .translations
            .entry(params.language.clone())
            .or_insert_with(|| TranslationRecord {
                snippet_key: params.snippet_key.clone(),
                language: params.language.clone(),
                text: String::new(),
                created_at: now,
                updated_at: now,
            });
        translation.text = params.text;
        translation.updated_at = now;

        Ok(translation.clone())
    }

    async fn delete_translation(&self, key: &str, language: &str) -> Result<bool, RepoError> {
        let mut guard = self.snippets.write().await;
        Ok(guard
            .get_mut(key)
            .is_some_and(|stored| stored.translations.remove(language).is_some()))
    }
}
