//! Application bootstrap tests

use std::sync::Arc;

use ctfai_application::ports::{GenerationServiceInterface, UsageStatsInterface};
use ctfai_application::use_cases::Principal;
use ctfai_domain::ErrorKind;
use ctfai_domain::ports::StateStoreProvider;
use ctfai_domain::value_objects::{GenerationRequest, ProviderConfig};
use ctfai_infrastructure::config::{AppConfig, ConfigBuilder};
use ctfai_infrastructure::{init_app, init_app_with_store};
use ctfai_providers::InMemoryStateStore;
use tempfile::TempDir;

fn memory_config(providers: &[&str]) -> AppConfig {
    providers
        .iter()
        .fold(ConfigBuilder::new().with_memory_storage(), |builder, name| {
            builder.with_provider(ProviderConfig::new(*name, "echo"))
        })
        .build()
}

#[tokio::test]
async fn test_init_app_wires_generation() {
    let context = init_app(memory_config(&["local"])).await.unwrap();

    let result = context
        .router()
        .generate(GenerationRequest::text("hello", 10, 0.5))
        .await
        .unwrap();
    assert!(result.is_success());
    assert_eq!(result.provider, "local");
    assert_eq!(
        context.usage_stats().snapshot().get("local").map(|s| s.total_calls),
        Some(1)
    );

    let views = context.admin().list_providers(Principal::admin(), false).unwrap();
    assert_eq!(views.len(), 1);
    assert!(views[0].is_default);
}

#[tokio::test]
async fn test_configured_default_provider_is_applied() {
    let config = ConfigBuilder::new()
        .with_memory_storage()
        .with_provider(ProviderConfig::new("a", "echo").with_priority(10))
        .with_provider(ProviderConfig::new("b", "echo"))
        .with_default_provider("b")
        .build();
    let context = init_app(config).await.unwrap();
    assert_eq!(context.registry().default_provider().as_deref(), Some("b"));
}

#[tokio::test]
async fn test_registry_snapshot_wins_over_config_providers() {
    let store = Arc::new(InMemoryStateStore::new());

    let first = init_app_with_store(memory_config(&["first"]), store.clone())
        .await
        .unwrap();
    assert_eq!(first.registry().list_enabled(), vec!["first".to_string()]);

    let second = init_app_with_store(memory_config(&["second"]), store)
        .await
        .unwrap();
    assert_eq!(second.registry().list_enabled(), vec!["first".to_string()]);
}

#[tokio::test]
async fn test_invalid_config_provider_fails_startup() {
    let config = ConfigBuilder::new()
        .with_memory_storage()
        .with_provider(ProviderConfig::new("broken", "no-such-adapter"))
        .build();
    let err = init_app(config).await.err().unwrap();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
}

#[tokio::test]
async fn test_usage_stats_survive_restart() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConfigBuilder::new()
        .with_data_dir(temp_dir.path())
        .with_provider(ProviderConfig::new("local", "echo"))
        .build();

    let context = init_app(config.clone()).await.unwrap();
    context
        .router()
        .generate(GenerationRequest::flag("buffer overflow", "pwn"))
        .await
        .unwrap();
    assert!(context.flush_usage_stats().await.unwrap());
    assert!(!context.flush_usage_stats().await.unwrap());
    drop(context);

    let restarted = init_app(config).await.unwrap();
    let stat = restarted.usage_stats().snapshot().get("local").cloned().unwrap();
    assert_eq!(stat.total_calls, 1);
    assert_eq!(stat.successful_calls, 1);
    assert!(restarted.state_store().load("provider_registry").await.unwrap().is_some());
}
