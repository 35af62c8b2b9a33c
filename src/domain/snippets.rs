//! Snippet invariants and the cached per-language view.
//!
//! A [`SnippetView`] is the materialized form of one snippet and all of its
//! translations. The empty language code keys the snippet's default text:
//!
//! ```text
//! { "": "Hello, humans", "es": "Hola, humanos", "en-au": "G'day, humans" }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{SnippetRecord, TranslationRecord};
use crate::domain::error::DomainError;

/// Language code under which a view stores the snippet's default text.
pub const DEFAULT_LANGUAGE: &str = "";

pub const MAX_KEY_LEN: usize = 250;
pub const MAX_LANGUAGE_LEN: usize = 5;

/// Language code to text, derived from a snippet and its translations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetView(BTreeMap<String, String>);

impl SnippetView {
    /// Build the view for `snippet`.
    ///
    /// The snippet's own text always occupies the default slot, even if a
    /// translation was stored under the empty language code.
    pub fn build<'a, I>(snippet: &SnippetRecord, translations: I) -> Self
    where
        I: IntoIterator<Item = &'a TranslationRecord>,
    {
        let mut entries: BTreeMap<String, String> = translations
            .into_iter()
            .map(|translation| (translation.language.clone(), translation.text.clone()))
            .collect();
        entries.insert(DEFAULT_LANGUAGE.to_string(), snippet.text.clone());
        Self(entries)
    }

    pub fn get(&self, language: &str) -> Option<&str> {
        self.0.get(language).map(String::as_str)
    }

    pub fn default_text(&self) -> Option<&str> {
        self.get(DEFAULT_LANGUAGE)
    }

    /// Text for `language`, falling back to the default text.
    ///
    /// The code is matched as given first, then trimmed and lowercased. With
    /// `fallback_to_base` set, a regional code such as `es-ar` is tried as
    /// its base language `es` before the default.
    pub fn resolve(&self, language: &str, fallback_to_base: bool) -> Option<&str> {
        if let Some(text) = self.get(language) {
            return Some(text);
        }

        let normalized = language.trim().to_ascii_lowercase();
        if let Some(text) = self.get(&normalized) {
            return Some(text);
        }

        if fallback_to_base {
            if let Some(text) = base_language(&normalized).and_then(|base| self.get(base)) {
                return Some(text);
            }
        }

        self.default_text()
    }
}

/// Base language of a regional code: `en-au` yields `en`.
pub fn base_language(language: &str) -> Option<&str> {
    language
        .split_once('-')
        .map(|(base, _)| base)
        .filter(|base| !base.is_empty())
}

/// Validate and trim a snippet key.
pub fn normalize_key(raw: &str) -> Result<String, DomainError> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(DomainError::validation("snippet key must not be empty"));
    }
    if key.chars().count() > MAX_KEY_LEN {
        return Err(DomainError::validation(format!(
            "snippet key must be at most {MAX_KEY_LEN} characters"
        )));
    }
    if key.chars().any(char::is_control) {
        return Err(DomainError::validation(
            "snippet key must not contain control characters",
        ));
    }
    Ok(key.to_string())
}

/// Validate a translation language code and lowercase it.
pub fn normalize_language(raw: &str) -> Result<String, DomainError> {
    let language = raw.trim().to_ascii_lowercase();
    if language.is_empty() {
        return Err(DomainError::validation(
            "translation language must not be empty",
        ));
    }
    if language.len() > MAX_LANGUAGE_LEN {
        return Err(DomainError::validation(format!(
            "translation language must be at most {MAX_LANGUAGE_LEN} characters"
        )));
    }
    let well_formed = language
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
        && !language.starts_with('-')
        && !language.ends_with('-');
    if !well_formed {
        return Err(DomainError::validation(format!(
            "translation language `{language}` is not a valid language code"
        )));
    }
    Ok(language)
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;

    fn snippet(key: &str, text: &str) -> SnippetRecord {
        let now = OffsetDateTime::now_utc();
        SnippetRecord {
            key: key.to_string(),
            text: text.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn translation(key: &str, language: &str, text: &str) -> TranslationRecord {
        let now = OffsetDateTime::now_utc();
        TranslationRecord {
            snippet_key: key.to_string(),
            language: language.to_string(),
            text: text.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn view_maps_languages_and_default() {
        let translations = vec![
            translation("greeting", "es", "Hola"),
            translation("greeting", "en-au", "G'day"),
        ];
        let view = SnippetView::build(&snippet("greeting", "Hello"), &translations);

        assert_eq!(view.default_text(), Some("Hello"));
        assert_eq!(view.get("es"), Some("Hola"));
        assert_eq!(view.get("en-au"), Some("G'day"));
    }

    #[test]
    fn default_text_wins_over_empty_language_translation() {
        let translations = vec![translation("greeting", "", "shadow")];
        let view = SnippetView::build(&snippet("greeting", "Hello"), &translations);

        assert_eq!(view.default_text(), Some("Hello"));
    }

    #[test]
    fn resolve_falls_back_to_default() {
        let translations = vec![translation("greeting", "es", "Hola")];
        let view = SnippetView::build(&snippet("greeting", "Hi"), &translations);

        assert_eq!(view.resolve("", false), Some("Hi"));
        assert_eq!(view.resolve("es", false), Some("Hola"));
        assert_eq!(view.resolve("de", false), Some("Hi"));
        assert_eq!(view.resolve("ES", false), Some("Hola"));
    }

    #[test]
    fn resolve_prefers_exact_code_over_normalized() {
        let translations = vec![
            translation("greeting", "pt-BR", "Olá"),
            translation("greeting", "pt-br", "Oi"),
            translation("greeting", "de", "Hallo"),
        ];
        let view = SnippetView::build(&snippet("greeting", "Hello"), &translations);

        assert_eq!(view.resolve("pt-BR", false), Some("Olá"));
        assert_eq!(view.resolve("pt-br", false), Some("Oi"));
        assert_eq!(view.resolve("PT-br", false), Some("Oi"));
        assert_eq!(view.resolve(" DE ", false), Some("Hallo"));
    }

    #[test]
    fn base_language_fallback_is_opt_in() {
        let translations = vec![translation("greeting", "es", "Hola")];
        let view = SnippetView::build(&snippet("greeting", "Hello"), &translations);

        assert_eq!(view.resolve("es-ar", false), Some("Hello"));
        assert_eq!(view.resolve("es-ar", true), Some("Hola"));
    }

    #[test]
    fn resolve_on_empty_view_is_none() {
        assert_eq!(SnippetView::default().resolve("es", true), None);
    }

    #[test]
    fn view_serializes_as_flat_object() {
        let translations = vec![translation("greeting", "es", "Hola")];
        let view = SnippetView::build(&snippet("greeting", "Hello"), &translations);

        let json = serde_json::to_string(&view).expect("serialize view");
        assert_eq!(json, r#"{"":"Hello","es":"Hola"}"#);
    }

    #[test]
    fn normalize_key_trims_and_rejects_empty() {
        assert_eq!(normalize_key("  footer.copy ").unwrap(), "footer.copy");
        assert!(normalize_key("   ").is_err());
        assert!(normalize_key("bad\nkey").is_err());
        assert!(normalize_key(&"k".repeat(MAX_KEY_LEN + 1)).is_err());
    }

    #[test]
    fn normalize_language_lowercases_codes() {
        assert_eq!(normalize_language("en-AU").unwrap(), "en-au");
        assert_eq!(normalize_language("es").unwrap(), "es");
        assert!(normalize_language("").is_err());
        assert!(normalize_language("en_au").is_err());
        assert!(normalize_language("-es").is_err());
        assert!(normalize_language("zh-hans").is_err());
    }

    #[test]
    fn base_language_splits_region() {
        assert_eq!(base_language("en-au"), Some("en"));
        assert_eq!(base_language("es"), None);
    }
}
