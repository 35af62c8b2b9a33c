//! Write path for snippets and translations.
//!
//! Every committed write is followed by a synchronous call into the
//! [`SnippetWriteHook`] so the cache is refreshed before the caller regains
//! control.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::application::repos::{
    RepoError, SnippetQueryFilter, SnippetsRepo, SnippetsWriteRepo, UpsertSnippetParams,
    UpsertTranslationParams,
};
use crate::domain::entities::{SnippetRecord, TranslationRecord};
use crate::domain::error::DomainError;
use crate::domain::snippets::{normalize_key, normalize_language};

/// Post-commit notifications for snippet writes.
#[async_trait]
pub trait SnippetWriteHook: Send + Sync {
    /// A snippet or one of its translations was created, updated or deleted.
    async fn snippet_written(&self, key: &str);

    /// A snippet was deleted together with its translations.
    async fn snippet_deleted(&self, key: &str);
}

#[derive(Debug, Error)]
pub enum SnippetServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("snippet `{key}` not found")]
    NotFound { key: String },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl SnippetServiceError {
    fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }
}

#[derive(Debug, Clone)]
pub struct SaveSnippetCommand {
    pub key: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct SaveTranslationCommand {
    pub key: String,
    pub language: String,
    pub text: String,
}

#[derive(Clone)]
pub struct SnippetService {
    reader: Arc<dyn SnippetsRepo>,
    writer: Arc<dyn SnippetsWriteRepo>,
    hook: Arc<dyn SnippetWriteHook>,
}

impl SnippetService {
    pub fn new(
        reader: Arc<dyn SnippetsRepo>,
        writer: Arc<dyn SnippetsWriteRepo>,
        hook: Arc<dyn SnippetWriteHook>,
    ) -> Self {
        Self {
            reader,
            writer,
            hook,
        }
    }

    pub async fn list(
        &self,
        filter: &SnippetQueryFilter,
    ) -> Result<Vec<SnippetRecord>, SnippetServiceError> {
        self.reader
            .list_snippets(filter)
            .await
            .map_err(SnippetServiceError::from)
    }

    pub async fn translations(
        &self,
        key: &str,
    ) -> Result<Vec<TranslationRecord>, SnippetServiceError> {
        let key = normalize_key(key)?;
        if self.reader.find_snippet(&key).await?.is_none() {
            return Err(SnippetServiceError::not_found(key));
        }
        self.reader
            .list_translations(&key)
            .await
            .map_err(SnippetServiceError::from)
    }

    pub async fn save_snippet(
        &self,
        command: SaveSnippetCommand,
    ) -> Result<SnippetRecord, SnippetServiceError> {
        let key = normalize_key(&command.key)?;
        let record = self
            .writer
            .upsert_snippet(UpsertSnippetParams {
                key,
                text: command.text,
            })
            .await?;

        self.hook.snippet_written(&record.key).await;
        info!(target = "snipcache::snippets", key = %record.key, "Snippet saved");
        Ok(record)
    }

    pub async fn delete_snippet(&self, key: &str) -> Result<(), SnippetServiceError> {
        let key = normalize_key(key)?;
        let existed = self.writer.delete_snippet(&key).await?;
        if !existed {
            return Err(SnippetServiceError::not_found(key));
        }

        self.hook.snippet_deleted(&key).await;
        info!(target = "snipcache::snippets", key = %key, "Snippet deleted");
        Ok(())
    }

    pub async fn save_translation(
        &self,
        command: SaveTranslationCommand,
    ) -> Result<TranslationRecord, SnippetServiceError> {
        let key = normalize_key(&command.key)?;
        let language = normalize_language(&command.language)?;

        let record = self
            .writer
            .upsert_translation(UpsertTranslationParams {
                snippet_key: key.clone(),
                language,
                text: command.text,
            })
            .await
            .map_err(|err| match err {
                RepoError::NotFound => SnippetServiceError::not_found(key.clone()),
                other => SnippetServiceError::Repo(other),
            })?;

        self.hook.snippet_written(&record.snippet_key).await;
        info!(
            target = "snipcache::snippets",
            key = %record.snippet_key,
            language = %record.language,
            "Translation saved"
        );
        Ok(record)
    }

    pub async fn delete_translation(
        &self,
        key: &str,
        language: &str,
    ) -> Result<(), SnippetServiceError> {
        let key = normalize_key(key)?;
        let language = normalize_language(language)?;

        let existed = self.writer.delete_translation(&key, &language).await?;
        if !existed {
            return Err(SnippetServiceError::not_found(format!("{key} ({language})")));
        }

        self.hook.snippet_written(&key).await;
        info!(
            target = "snipcache::snippets",
            key = %key,
            language = %language,
            "Translation deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::infra::memory::InMemorySnippets;

    #[derive(Default)]
    struct RecordingHook {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingHook {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("hook calls lock").clone()
        }
    }

    #[async_trait]
    impl SnippetWriteHook for RecordingHook {
        async fn snippet_written(&self, key: &str) {
            self.calls
                .lock()
                .expect("hook calls lock")
                .push(format!("written:{key}"));
        }

        async fn snippet_deleted(&self, key: &str) {
            self.calls
                .lock()
                .expect("hook calls lock")
                .push(format!("deleted:{key}"));
        }
    }

    fn service() -> (SnippetService, Arc<RecordingHook>) {
        let store = Arc::new(InMemorySnippets::new());
        let hook = Arc::new(RecordingHook::default());
        let service = SnippetService::new(store.clone(), store, hook.clone());
        (service, hook)
    }

    #[tokio::test]
    async fn save_snippet_notifies_after_commit() {
        let (service, hook) = service();

        let record = service
            .save_snippet(SaveSnippetCommand {
                key: " greeting ".to_string(),
                text: "Hello".to_string(),
            })
            .await
            .expect("save snippet");

        assert_eq!(record.key, "greeting");
        assert_eq!(hook.calls(), vec!["written:greeting"]);
    }

    #[tokio::test]
    async fn translation_writes_notify_owning_snippet() {
        let (service, hook) = service();
        service
            .save_snippet(SaveSnippetCommand {
                key: "greeting".to_string(),
                text: "Hello".to_string(),
            })
            .await
            .expect("save snippet");

        let translation = service
            .save_translation(SaveTranslationCommand {
                key: "greeting".to_string(),
                language: "ES".to_string(),
                text: "Hola".to_string(),
            })
            .await
            .expect("save translation");
        assert_eq!(translation.language, "es");

        service
            .delete_translation("greeting", "es")
            .await
            .expect("delete translation");

        assert_eq!(
            hook.calls(),
            vec!["written:greeting", "written:greeting", "written:greeting"]
        );
    }

    #[tokio::test]
    async fn translation_for_unknown_snippet_is_not_found() {
        let (service, hook) = service();

        let err = service
            .save_translation(SaveTranslationCommand {
                key: "missing".to_string(),
                language: "es".to_string(),
                text: "Hola".to_string(),
            })
            .await
            .expect_err("translation without snippet");

        assert!(matches!(err, SnippetServiceError::NotFound { ref key } if key == "missing"));
        assert!(hook.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_snippet_notifies_deletion() {
        let (service, hook) = service();
        service
            .save_snippet(SaveSnippetCommand {
                key: "greeting".to_string(),
                text: "Hello".to_string(),
            })
            .await
            .expect("save snippet");

        service
            .delete_snippet("greeting")
            .await
            .expect("delete snippet");

        assert_eq!(hook.calls(), vec!["written:greeting", "deleted:greeting"]);
        assert!(matches!(
            service.delete_snippet("greeting").await,
            Err(SnippetServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_store() {
        let (service, hook) = service();

        let err = service
            .save_snippet(SaveSnippetCommand {
                key: "   ".to_string(),
                text: "Hello".to_string(),
            })
            .await
            .expect_err("empty key");
        assert!(matches!(err, SnippetServiceError::Domain(_)));

        let err = service
            .save_translation(SaveTranslationCommand {
                key: "greeting".to_string(),
                language: "".to_string(),
                text: "Hola".to_string(),
            })
            .await
            .expect_err("empty language");
        assert!(matches!(err, SnippetServiceError::Domain(_)));

        assert!(hook.calls().is_empty());
    }
}
