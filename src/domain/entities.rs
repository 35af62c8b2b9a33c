//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;

/// A keyed unit of default-language text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnippetRecord {
    pub key: String,
    pub text: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A language-specific override of a snippet's text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationRecord {
    pub snippet_key: String,
    pub language: String,
    pub text: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
