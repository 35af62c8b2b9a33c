//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{SnippetRecord, TranslationRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SnippetQueryFilter {
    pub search: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct UpsertSnippetParams {
    pub key: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct UpsertTranslationParams {
    pub snippet_key: String,
    pub language: String,
    pub text: String,
}

#[async_trait]
pub trait SnippetsRepo: Send + Sync {
    async fn find_snippet(&self, key: &str) -> Result<Option<SnippetRecord>, RepoError>;

    async fn list_translations(&self, key: &str) -> Result<Vec<TranslationRecord>, RepoError>;

    async fn list_snippets(
        &self,
        filter: &SnippetQueryFilter,
    ) -> Result<Vec<SnippetRecord>, RepoError>;
}

#[async_trait]
pub trait SnippetsWriteRepo: Send + Sync {
    async fn upsert_snippet(&self, params: UpsertSnippetParams) -> Result<SnippetRecord, RepoError>;

    /// Returns `false` when no snippet was stored under `key`.
    async fn delete_snippet(&self, key: &str) -> Result<bool, RepoError>;

    /// Fails with [`RepoError::NotFound`] when the owning snippet does not exist.
    async fn upsert_translation(
        &self,
        params: UpsertTranslationParams,
    ) -> Result<TranslationRecord, RepoError>;

    async fn delete_translation(&self, key: &str, language: &str) -> Result<bool, RepoError>;
}
