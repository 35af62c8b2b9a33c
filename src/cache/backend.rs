//! Key/value backend consumed by the snippet cache.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::snippets::SnippetView;

/// Value stored under a snippet's cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    /// Negative marker: the store was asked and holds no such snippet.
    Missing,
    /// Materialized snippet text for every language.
    View(SnippetView),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {message}")]
    Unavailable { message: String },
}

impl CacheError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// External key/value store.
///
/// Operations are atomic per key. Nothing is assumed about ordering across
/// keys, and entries may disappear at any time.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;

    async fn set(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Backend that stores nothing; every read is a miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledBackend;

#[async_trait]
impl CacheBackend for DisabledBackend {
    async fn get(&self, _key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _entry: CacheEntry) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_backend_never_retains_entries() {
        let backend = DisabledBackend;
        backend
            .set("snippet:greeting", CacheEntry::Missing)
            .await
            .expect("set");

        assert_eq!(backend.get("snippet:greeting").await.expect("get"), None);
        backend.delete("snippet:greeting").await.expect("delete");
    }

    #[test]
    fn unavailable_error_carries_message() {
        assert_eq!(
            CacheError::unavailable("connection refused").to_string(),
            "cache backend unavailable: connection refused"
        );
    }
}
