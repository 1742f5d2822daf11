//! Tests for the provider registry

use std::sync::Arc;
use std::time::Duration;

use ctfai_application::ports::UsageStatsInterface;
use ctfai_application::use_cases::{DeadlinePolicy, ProviderRegistry};
use ctfai_domain::ErrorKind;
use ctfai_domain::ports::{GenerationProvider, StateStoreProvider};
use ctfai_domain::value_objects::{ProviderConfig, ProviderPatch};
use ctfai_providers::InMemoryStateStore;

use crate::support::{echo, echo_mode, services, services_with_store};

#[tokio::test]
async fn test_hydrate_from_configuration_lists_by_name() {
    let s = services(&[echo("zeta", 0), echo("alpha", 0)]).await;
    let names: Vec<String> = s.registry.list().iter().map(|c| c.name.clone()).collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
}

#[tokio::test]
async fn test_default_is_highest_priority_enabled_provider() {
    let s = services(&[
        echo("low", 0).with_priority(1),
        echo("high", 0).with_priority(10),
        echo("off", 0).with_priority(99).with_enabled(false),
    ])
    .await;
    assert_eq!(s.registry.default_provider().as_deref(), Some("high"));
    assert_eq!(s.registry.resolve(None).unwrap().name(), "high");
}

#[tokio::test]
async fn test_priority_ties_break_by_name() {
    let s = services(&[echo("b", 0), echo("a", 0)]).await;
    assert_eq!(s.registry.default_provider().as_deref(), Some("a"));
}

#[tokio::test]
async fn test_configured_default_wins_and_must_be_enabled() {
    let store = Arc::new(InMemoryStateStore::new());
    let s = services_with_store(
        store,
        &[echo("main", 0).with_enabled(false), echo("other", 0).with_priority(50)],
        Some("main"),
    )
    .await;

    assert_eq!(s.registry.default_provider().as_deref(), Some("main"));
    let err = s.registry.resolve(None).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::NoProviderAvailable);
}

#[tokio::test]
async fn test_resolve_explicit_names() {
    let s = services(&[echo("on", 0), echo("off", 0).with_enabled(false)]).await;

    assert_eq!(s.registry.resolve(Some("on")).unwrap().name(), "on");
    assert_eq!(
        s.registry.resolve(Some("off")).err().unwrap().kind(),
        ErrorKind::ProviderDisabled
    );
    assert_eq!(
        s.registry.resolve(Some("missing")).err().unwrap().kind(),
        ErrorKind::NoProviderAvailable
    );
}

#[tokio::test]
async fn test_empty_registry_has_no_provider() {
    let s = services(&[]).await;
    assert_eq!(s.registry.default_provider(), None);
    assert_eq!(
        s.registry.resolve(None).err().unwrap().kind(),
        ErrorKind::NoProviderAvailable
    );
}

#[tokio::test]
async fn test_create_rejects_duplicates_and_unknown_kinds() {
    let s = services(&[echo("a", 0)]).await;

    let err = s.registry.create(echo("a", 0)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);

    let err = s
        .registry
        .create(ProviderConfig::new("b", "carrier-pigeon"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);

    let err = s
        .registry
        .create(ProviderConfig::new("bad name!", "echo"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);

    let err = s
        .registry
        .create(ProviderConfig::new("c", "openai").with_endpoint("not a url"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);

    assert_eq!(s.registry.list().len(), 1);
}

#[tokio::test]
async fn test_update_and_remove_missing_provider() {
    let s = services(&[]).await;
    assert_eq!(
        s.registry
            .patch("ghost", ProviderPatch::default())
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        s.registry.remove("ghost").await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        s.registry.get("ghost").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_absent_api_key_keeps_stored_secret() {
    let s = services(&[]).await;
    s.registry
        .create(
            ProviderConfig::new("deepseek", "openai")
                .with_endpoint("https://api.deepseek.com/v1")
                .with_api_key("sk-secret"),
        )
        .await
        .unwrap();

    let stored = s
        .registry
        .upsert(
            ProviderConfig::new("deepseek", "openai")
                .with_endpoint("https://api.deepseek.com/v1")
                .with_model("deepseek-reasoner"),
        )
        .await
        .unwrap();
    assert_eq!(stored.api_key.as_deref(), Some("sk-secret"));
    assert_eq!(stored.model.as_deref(), Some("deepseek-reasoner"));

    let patched = s
        .registry
        .patch(
            "deepseek",
            ProviderPatch {
                priority: Some(4),
                ..ProviderPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(patched.api_key.as_deref(), Some("sk-secret"));

    let cleared = s
        .registry
        .upsert(ProviderConfig::new("deepseek", "openai").with_api_key(""))
        .await
        .unwrap();
    assert_eq!(cleared.api_key, None);
}

#[tokio::test]
async fn test_state_survives_restart_and_ignores_initial_configs() {
    let store = Arc::new(InMemoryStateStore::new());
    {
        let s = services_with_store(store.clone(), &[echo("a", 0)], None).await;
        s.registry.create(echo("b", 0)).await.unwrap();
        s.registry.set_default("b").await.unwrap();
    }

    let s = services_with_store(store, &[echo("from-config", 0)], None).await;
    let names: Vec<String> = s.registry.list().iter().map(|c| c.name.clone()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(s.registry.default_provider().as_deref(), Some("b"));
}

#[tokio::test]
async fn test_failed_persist_leaves_state_unchanged() {
    struct FailingStore;

    #[async_trait::async_trait]
    impl StateStoreProvider for FailingStore {
        async fn save(&self, _key: &str, _data: &[u8]) -> ctfai_domain::Result<()> {
            Err(ctfai_domain::Error::io("disk full"))
        }
        async fn load(&self, _key: &str) -> ctfai_domain::Result<Option<Vec<u8>>> {
            Ok(None)
        }
        async fn delete(&self, _key: &str) -> ctfai_domain::Result<()> {
            Ok(())
        }
    }

    let registry = ProviderRegistry::new(Arc::new(FailingStore), DeadlinePolicy::default());
    assert!(registry.hydrate(&[echo("a", 0)], None).await.is_err());
    assert!(registry.create(echo("b", 0)).await.is_err());
    assert!(registry.list().is_empty());
}

#[tokio::test]
async fn test_remove_clears_configured_default() {
    let store = Arc::new(InMemoryStateStore::new());
    let s = services_with_store(store, &[echo("a", 0), echo("b", 0).with_priority(5)], Some("a")).await;
    s.registry.remove("a").await.unwrap();
    assert_eq!(s.registry.default_provider().as_deref(), Some("b"));
}

#[tokio::test]
async fn test_in_flight_handle_outlives_removal() {
    let s = services(&[echo("a", 0)]).await;
    let handle = s.registry.resolve(Some("a")).unwrap();
    s.registry.remove("a").await.unwrap();

    assert_eq!(handle.name(), "a");
    assert_eq!(handle.adapter.provider_kind(), "echo");
}

#[tokio::test]
async fn test_seed_defaults_creates_disabled_catalogue_once() {
    let s = services(&[]).await;

    let created = s.registry.seed_defaults().await.unwrap();
    assert_eq!(created.len(), 6);
    assert!(created.contains(&"openai".to_string()));
    assert!(created.contains(&"google".to_string()));
    assert!(s.registry.list().iter().all(|c| !c.enabled && !c.has_api_key()));
    assert!(s.registry.list_enabled().is_empty());

    let again = s.registry.seed_defaults().await.unwrap();
    assert!(again.is_empty());
}

#[tokio::test]
async fn test_connectivity_reports_success_and_failure() {
    let s = services(&[
        echo("ok", 5),
        echo_mode("broken", "fail").with_enabled(false),
        echo_mode("stuck", "hang").with_timeout_ms(50),
    ])
    .await;

    let ok = s.registry.test_connectivity("ok").await.unwrap();
    assert!(ok.success);
    assert!(ok.error.is_none());

    let broken = s.registry.test_connectivity("broken").await.unwrap();
    assert!(!broken.success);
    assert!(broken.error.is_some());

    let stuck = s.registry.test_connectivity("stuck").await.unwrap();
    assert!(!stuck.success);
    assert!(stuck.latency_ms >= 50);

    assert!(s.stats.snapshot().providers.is_empty());
}

/// Store whose writes take a while, widening any read-modify-write window
struct SlowStore {
    inner: InMemoryStateStore,
    delay: Duration,
}

#[async_trait::async_trait]
impl StateStoreProvider for SlowStore {
    async fn save(&self, key: &str, data: &[u8]) -> ctfai_domain::Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.save(key, data).await
    }
    async fn load(&self, key: &str) -> ctfai_domain::Result<Option<Vec<u8>>> {
        self.inner.load(key).await
    }
    async fn delete(&self, key: &str) -> ctfai_domain::Result<()> {
        self.inner.delete(key).await
    }
}

#[tokio::test]
async fn test_concurrent_patches_build_on_each_other() {
    let store = Arc::new(SlowStore {
        inner: InMemoryStateStore::new(),
        delay: Duration::from_millis(150),
    });
    let registry = Arc::new(ProviderRegistry::new(store.clone(), DeadlinePolicy::default()));
    registry.hydrate(&[echo("a", 0)], None).await.unwrap();

    let disable = {
        let registry = registry.clone();
        tokio::spawn(async move {
            let patch = ProviderPatch {
                enabled: Some(false),
                ..ProviderPatch::default()
            };
            registry.patch("a", patch).await
        })
    };
    tokio::time::sleep(Duration::from_millis(40)).await;
    let reprioritize = {
        let registry = registry.clone();
        tokio::spawn(async move {
            let patch = ProviderPatch {
                priority: Some(5),
                ..ProviderPatch::default()
            };
            registry.patch("a", patch).await
        })
    };
    disable.await.unwrap().unwrap();
    let last = reprioritize.await.unwrap().unwrap();

    assert!(!last.enabled);
    assert_eq!(last.priority, 5);
    let current = registry.get("a").unwrap();
    assert!(!current.enabled);
    assert_eq!(current.priority, 5);
    assert_eq!(
        registry.resolve(Some("a")).unwrap_err().kind(),
        ErrorKind::ProviderDisabled
    );

    // The persisted copy carries both changes
    let reloaded = ProviderRegistry::new(store, DeadlinePolicy::default());
    reloaded.hydrate(&[], None).await.unwrap();
    let persisted = reloaded.get("a").unwrap();
    assert!(!persisted.enabled);
    assert_eq!(persisted.priority, 5);
}

#[tokio::test]
async fn test_patch_rejects_renames_and_missing_providers() {
    let s = services(&[echo("a", 0)]).await;

    let rename = ProviderPatch {
        name: Some("b".to_string()),
        ..ProviderPatch::default()
    };
    assert_eq!(
        s.registry.patch("a", rename).await.unwrap_err().kind(),
        ErrorKind::InvalidConfig
    );
    assert_eq!(
        s.registry
            .patch("ghost", ProviderPatch::default())
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
}

async fn store_with_legacy_provider() -> Arc<InMemoryStateStore> {
    let store = Arc::new(InMemoryStateStore::new());
    let persisted = serde_json::json!({
        "providers": [
            { "name": "a", "kind": "echo" },
            { "name": "legacy", "kind": "removed_adapter", "api_key": "sk-old" }
        ]
    });
    store
        .save("provider_registry", persisted.to_string().as_bytes())
        .await
        .unwrap();
    store
}

async fn persisted_names(store: &InMemoryStateStore) -> Vec<String> {
    let data = store.load("provider_registry").await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&data).unwrap();
    value["providers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_unbuildable_stored_provider_survives_unrelated_writes() {
    let store = store_with_legacy_provider().await;
    let s = services_with_store(store.clone(), &[], None).await;

    let live: Vec<String> = s.registry.list().iter().map(|c| c.name.clone()).collect();
    assert_eq!(live, vec!["a"]);

    let stored = s.registry.stored();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1].config.name, "legacy");
    assert!(stored[1].unavailable_reason.is_some());

    s.registry.set_default("a").await.unwrap();
    s.registry.create(echo("b", 0)).await.unwrap();
    assert_eq!(persisted_names(&store).await, vec!["a", "b", "legacy"]);

    let data = store.load("provider_registry").await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&data).unwrap();
    assert_eq!(value["providers"][2]["api_key"], "sk-old");
}

#[tokio::test]
async fn test_parked_provider_never_serves_calls() {
    let store = store_with_legacy_provider().await;
    let s = services_with_store(store, &[], None).await;

    assert_eq!(
        s.registry.resolve(Some("legacy")).unwrap_err().kind(),
        ErrorKind::NoProviderAvailable
    );
    assert!(!s.registry.list_enabled().contains(&"legacy".to_string()));

    let report = s.registry.test_connectivity("legacy").await.unwrap();
    assert!(!report.success);
    assert!(report.error.is_some());

    // A parked name is still taken
    assert_eq!(
        s.registry
            .create(echo("legacy", 0))
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::InvalidConfig
    );

    // Configured default pointing at a parked provider does not fall through
    s.registry.set_default("legacy").await.unwrap();
    assert_eq!(
        s.registry.resolve(None).unwrap_err().kind(),
        ErrorKind::NoProviderAvailable
    );
}

#[tokio::test]
async fn test_fixing_a_parked_provider_revives_it_with_its_secret() {
    let store = store_with_legacy_provider().await;
    let s = services_with_store(store.clone(), &[], None).await;

    let fix = ProviderPatch {
        kind: Some("echo".to_string()),
        ..ProviderPatch::default()
    };
    let revived = s.registry.patch("legacy", fix).await.unwrap();
    assert_eq!(revived.api_key.as_deref(), Some("sk-old"));
    assert!(s.registry.stored().iter().all(|p| p.unavailable_reason.is_none()));
    assert_eq!(s.registry.resolve(Some("legacy")).unwrap().name(), "legacy");

    s.registry.remove("legacy").await.unwrap();
    assert_eq!(persisted_names(&store).await, vec!["a"]);
}
