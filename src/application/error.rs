use thiserror::Error;

use crate::{
    application::snippets::SnippetServiceError, cache::SnippetCacheError,
    infra::error::InfraError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Snippets(#[from] SnippetServiceError),
    #[error(transparent)]
    Cache(#[from] SnippetCacheError),
    #[error("snippet `{key}` not found")]
    NotFound { key: String },
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Process exit status for the command-line front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::NotFound { .. } | AppError::Snippets(SnippetServiceError::NotFound { .. }) => {
                2
            }
            AppError::Snippets(SnippetServiceError::Domain(_)) => 64,
            AppError::Infra(InfraError::Configuration { .. }) => 78,
            AppError::Cache(SnippetCacheError::StoreUnavailable(_))
            | AppError::Infra(InfraError::Database { .. })
            | AppError::Snippets(SnippetServiceError::Repo(_)) => 69,
            AppError::Infra(_) | AppError::Unexpected(_) => 1,
        }
    }
}
