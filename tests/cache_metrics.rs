mod support;

use std::collections::HashSet;
use std::sync::Arc;

use metrics_util::debugging::DebuggingRecorder;
use snipcache::cache::{CacheConfig, SnippetCache};

use support::{BrokenBackend, Harness};

#[tokio::test]
async fn cache_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    // Miss, hit, negative hit and one LRU eviction
    let harness = Harness::with_config(CacheConfig {
        capacity: 1,
        ..Default::default()
    });
    harness.seed("greeting", "Hello", &[("es", "Hola")]).await;
    harness.seed("farewell", "Bye", &[]).await;

    assert_eq!(
        harness.cache.resolve_text("greeting", "es").await.unwrap(),
        Some("Hola".to_string())
    );
    assert_eq!(
        harness.cache.resolve_text("greeting", "").await.unwrap(),
        Some("Hello".to_string())
    );
    assert_eq!(harness.cache.resolve_text("nope", "").await.unwrap(), None);
    assert_eq!(harness.cache.resolve_text("nope", "").await.unwrap(), None);
    assert_eq!(
        harness.cache.resolve_text("farewell", "").await.unwrap(),
        Some("Bye".to_string())
    );

    // Backend failure bypass
    let broken = SnippetCache::new(
        CacheConfig::default(),
        Arc::new(BrokenBackend::default()),
        harness.store.clone(),
    );
    assert_eq!(
        broken.resolve_text("greeting", "").await.unwrap(),
        Some("Hello".to_string())
    );

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "snipcache_cache_hit_total",
        "snipcache_cache_negative_hit_total",
        "snipcache_cache_miss_total",
        "snipcache_cache_bypass_total",
        "snipcache_cache_evict_total",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
