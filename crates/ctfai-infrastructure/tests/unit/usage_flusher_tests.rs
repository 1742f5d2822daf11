//! Usage statistics flusher tests

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use ctfai_application::ports::UsageStatsInterface;
use ctfai_application::use_cases::UsageStatsAggregator;
use ctfai_domain::constants::USAGE_STATE_KEY;
use ctfai_domain::ports::StateStoreProvider;
use ctfai_infrastructure::usage_flusher::UsageFlusher;
use ctfai_providers::InMemoryStateStore;

#[tokio::test]
async fn test_flush_if_dirty_skips_clean_counters() {
    let stats = UsageStatsAggregator::new();
    let store = InMemoryStateStore::new();

    assert!(!UsageFlusher::flush_if_dirty(&stats, &store).await.unwrap());
    assert!(store.load(USAGE_STATE_KEY).await.unwrap().is_none());

    stats.record("a", true, 5, None);
    assert!(UsageFlusher::flush_if_dirty(&stats, &store).await.unwrap());
    assert!(!stats.is_dirty());
    assert!(store.load(USAGE_STATE_KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn test_flusher_writes_on_interval() {
    let stats = Arc::new(UsageStatsAggregator::new());
    let store = Arc::new(InMemoryStateStore::new());
    let shutdown = CancellationToken::new();

    let handle = UsageFlusher::new(stats.clone(), store.clone(), Duration::from_millis(20))
        .spawn(shutdown.clone());
    stats.record("a", false, 7, None);
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(!stats.is_dirty());
    assert!(store.load(USAGE_STATE_KEY).await.unwrap().is_some());

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_flusher_writes_on_shutdown() {
    let stats = Arc::new(UsageStatsAggregator::new());
    let store = Arc::new(InMemoryStateStore::new());
    let shutdown = CancellationToken::new();

    let handle = UsageFlusher::new(stats.clone(), store.clone(), Duration::from_secs(3600))
        .spawn(shutdown.clone());
    stats.record("a", true, 3, Some(12));

    shutdown.cancel();
    handle.await.unwrap();

    let data = store.load(USAGE_STATE_KEY).await.unwrap().unwrap();
    let restored = UsageStatsAggregator::new();
    let restore_store = InMemoryStateStore::new();
    restore_store.save(USAGE_STATE_KEY, &data).await.unwrap();
    assert_eq!(restored.restore(&restore_store).await.unwrap(), 1);
    assert_eq!(restored.snapshot().get("a").map(|s| s.total_tokens), Some(12));
}
