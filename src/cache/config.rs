//! Cache configuration.
//!
//! Built from the `[cache]` section of `snipcache.toml`, or directly by
//! embedders that need a custom [`KeyPrefix`].

use std::num::NonZeroUsize;

use super::keys::KeyPrefix;

// Default values for cache configuration
const DEFAULT_CAPACITY: usize = 10_000;

/// Settings injected into [`SnippetCache`](super::SnippetCache) at construction.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Use the cache backend at all.
    pub enabled: bool,
    /// Maximum snippet entries held by the in-memory backend.
    pub capacity: usize,
    /// Snippet key to cache key mapping.
    pub prefix: KeyPrefix,
    /// Try `es` for `es-ar` before falling back to the default text.
    pub fallback_to_base_language: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: DEFAULT_CAPACITY,
            prefix: KeyPrefix::default(),
            fallback_to_base_language: false,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            capacity: settings.capacity.get(),
            prefix: KeyPrefix::with_namespace(settings.key_prefix.clone()),
            fallback_to_base_language: settings.fallback_to_base_language,
        }
    }
}

impl CacheConfig {
    pub fn with_prefix(mut self, prefix: KeyPrefix) -> Self {
        self.prefix = prefix;
        self
    }

    /// Cache key for `key` under the configured prefix.
    pub fn cache_key(&self, key: &str) -> String {
        self.prefix.apply(key)
    }

    /// Returns the capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn capacity_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.capacity).unwrap_or(NonZeroUsize::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.capacity, 10_000);
        assert!(!config.fallback_to_base_language);
        assert_eq!(config.cache_key("greeting"), "snippet:greeting");
    }

    #[test]
    fn with_prefix_replaces_mapping() {
        let config =
            CacheConfig::default().with_prefix(KeyPrefix::custom(|key| format!("t:{key}")));
        assert_eq!(config.cache_key("greeting"), "t:greeting");
    }

    #[test]
    fn non_zero_clamps_to_min() {
        let config = CacheConfig {
            capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.capacity_non_zero().get(), 1);
    }
}
