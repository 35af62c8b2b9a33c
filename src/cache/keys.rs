//! Cache key construction.
//!
//! Snippet keys are mapped into the backend namespace by a [`KeyPrefix`].
//! The default mapping prepends a namespace to the percent-escaped key; every
//! byte outside `[A-Za-z0-9._~-]` is escaped, `%` included, so two distinct
//! snippet keys never share a cache key and no cache key carries whitespace
//! or control characters.

use std::fmt;
use std::sync::Arc;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

pub const DEFAULT_KEY_PREFIX: &str = "snippet:";

const KEY_ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'-');

/// Percent-escape a snippet key for use inside a cache key.
pub fn escape_key(key: &str) -> String {
    utf8_percent_encode(key, KEY_ESCAPE_SET).to_string()
}

type PrefixFn = dyn Fn(&str) -> String + Send + Sync;

/// Maps a snippet key to its cache key.
///
/// Custom functions must stay injective over the snippet keys in use.
#[derive(Clone)]
pub struct KeyPrefix(Arc<PrefixFn>);

impl KeyPrefix {
    /// `namespace` followed by the escaped snippet key.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self::custom(move |key| format!("{namespace}{}", escape_key(key)))
    }

    pub fn custom<F>(prefix: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(prefix))
    }

    pub fn apply(&self, key: &str) -> String {
        (self.0)(key)
    }
}

impl Default for KeyPrefix {
    fn default() -> Self {
        Self::with_namespace(DEFAULT_KEY_PREFIX)
    }
}

impl fmt::Debug for KeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeyPrefix")
            .field(&self.apply("{key}"))
            .finish()
    }
}
