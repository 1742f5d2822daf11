//! Tests for the admin config service

use std::sync::Arc;

use chrono::Utc;
use ctfai_application::ports::{GenerationServiceInterface, UsageStatsInterface};
use ctfai_application::use_cases::Principal;
use ctfai_domain::ErrorKind;
use ctfai_domain::ports::StateStoreProvider;
use ctfai_domain::value_objects::{GenerationRequest, ProviderConfig, ProviderPatch};
use ctfai_providers::InMemoryStateStore;

use crate::support::{echo, echo_mode, services, services_with_store};

#[tokio::test]
async fn test_non_admin_is_forbidden_everywhere() {
    let s = services(&[echo("A", 0)]).await;
    let anon = Principal::anonymous();

    let forbidden = |kind: ErrorKind| assert_eq!(kind, ErrorKind::Forbidden);
    forbidden(s.admin.list_providers(anon, false).unwrap_err().kind());
    forbidden(s.admin.get_provider(anon, "A").unwrap_err().kind());
    forbidden(s.admin.create_provider(anon, echo("B", 0)).await.unwrap_err().kind());
    forbidden(
        s.admin
            .update_provider(anon, "A", ProviderPatch::default())
            .await
            .unwrap_err()
            .kind(),
    );
    forbidden(s.admin.delete_provider(anon, "A").await.unwrap_err().kind());
    forbidden(s.admin.set_default_provider(anon, "A").await.unwrap_err().kind());
    forbidden(s.admin.seed_defaults(anon).await.unwrap_err().kind());
    forbidden(s.admin.test_connectivity(anon, "A").await.unwrap_err().kind());
    forbidden(s.admin.usage_stats(anon, None, None).unwrap_err().kind());
    forbidden(s.admin.call_log(anon, None, None).unwrap_err().kind());

    let names: Vec<String> = s.registry.list().iter().map(|c| c.name.clone()).collect();
    assert_eq!(names, vec!["A"]);
}

#[tokio::test]
async fn test_views_never_expose_secrets() {
    let s = services(&[]).await;
    let admin = Principal::admin();

    let view = s
        .admin
        .create_provider(
            admin,
            ProviderConfig::new("deepseek", "openai")
                .with_endpoint("https://api.deepseek.com/v1")
                .with_api_key("sk-very-secret"),
        )
        .await
        .unwrap();
    assert!(view.api_key_configured);
    assert!(view.api_base_configured);
    assert!(view.is_default);

    let json = serde_json::to_string(&s.admin.list_providers(admin, false).unwrap()).unwrap();
    assert!(!json.contains("sk-very-secret"));
}

#[tokio::test]
async fn test_update_applies_patch_and_keeps_name() {
    let s = services(&[echo("A", 0).with_priority(3)]).await;
    let admin = Principal::admin();

    let view = s
        .admin
        .update_provider(
            admin,
            "A",
            ProviderPatch {
                enabled: Some(false),
                display_name: Some("Echo A".to_string()),
                ..ProviderPatch::default()
            },
        )
        .await
        .unwrap();
    assert!(!view.enabled);
    assert_eq!(view.display_name, "Echo A");
    assert_eq!(view.priority, 3);

    let err = s
        .admin
        .update_provider(
            admin,
            "A",
            ProviderPatch {
                name: Some("renamed".to_string()),
                ..ProviderPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);

    let err = s
        .admin
        .update_provider(admin, "missing", ProviderPatch::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_list_enabled_only_and_delete() {
    let s = services(&[echo("A", 0), echo("B", 0).with_enabled(false)]).await;
    let admin = Principal::admin();

    let enabled = s.admin.list_providers(admin, true).unwrap();
    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].name, "A");

    s.admin.delete_provider(admin, "B").await.unwrap();
    assert_eq!(
        s.admin.get_provider(admin, "B").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_set_default_moves_the_default_flag() {
    let s = services(&[echo("A", 0).with_priority(10), echo("B", 0)]).await;
    let admin = Principal::admin();

    assert!(s.admin.get_provider(admin, "A").unwrap().is_default);
    s.admin.set_default_provider(admin, "B").await.unwrap();
    assert!(s.admin.get_provider(admin, "B").unwrap().is_default);
    assert!(!s.admin.get_provider(admin, "A").unwrap().is_default);
}

#[tokio::test]
async fn test_usage_stats_filter() {
    let s = services(&[echo("A", 0), echo("B", 0)]).await;
    let admin = Principal::admin();
    for name in ["A", "A", "B"] {
        s.router
            .generate(GenerationRequest::text("x", 10, 0.5).with_provider(name))
            .await
            .unwrap();
    }

    let all = s.admin.usage_stats(admin, None, None).unwrap();
    assert_eq!(all.summary.total_calls, 3);
    assert_eq!(all.window_summary.total_calls, 3);
    assert_eq!(all.date_range.days, 7);
    assert_eq!(all.date_range.end_date, Utc::now().date_naive());
    assert_eq!(all.daily_stats.len(), 2);
    assert_eq!(all.providers, s.stats.snapshot().providers);

    let only_a = s.admin.usage_stats(admin, Some("A"), Some(1)).unwrap();
    assert_eq!(only_a.providers.len(), 1);
    assert_eq!(only_a.providers["A"].total_calls, 2);
    assert_eq!(only_a.summary.total_calls, 2);
    assert_eq!(only_a.daily_stats.len(), 1);
    assert_eq!(only_a.daily_stats[0].provider, "A");
    assert_eq!(only_a.date_range.start_date, only_a.date_range.end_date);

    let none = s.admin.usage_stats(admin, Some("nobody"), None).unwrap();
    assert!(none.providers.is_empty());
    assert!(none.daily_stats.is_empty());
    assert_eq!(none.summary.total_calls, 0);
}

#[tokio::test]
async fn test_usage_window_is_validated_and_capped() {
    let s = services(&[echo("A", 0)]).await;
    let admin = Principal::admin();

    assert_eq!(
        s.admin.usage_stats(admin, None, Some(0)).unwrap_err().kind(),
        ErrorKind::InvalidRequest
    );
    let capped = s.admin.usage_stats(admin, None, Some(365)).unwrap();
    assert_eq!(capped.date_range.days, 90);
}

#[tokio::test]
async fn test_call_log_filters_and_limits() {
    let s = services(&[echo("A", 0), echo_mode("B", "fail")]).await;
    let admin = Principal::admin();
    for name in ["A", "B", "A", "A"] {
        let _ = s
            .router
            .generate(GenerationRequest::text("x", 10, 0.5).with_provider(name))
            .await;
    }

    let all = s.admin.call_log(admin, None, None).unwrap();
    assert_eq!(all.len(), 4);
    let failed: Vec<_> = all.iter().filter(|c| !c.success).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].provider, "B");
    assert!(failed[0].error.is_some());

    let two_a = s.admin.call_log(admin, Some("A"), Some(2)).unwrap();
    assert_eq!(two_a.len(), 2);
    assert!(two_a.iter().all(|c| c.provider == "A" && c.success));

    assert_eq!(
        s.admin.call_log(admin, None, Some(0)).unwrap_err().kind(),
        ErrorKind::InvalidRequest
    );
    assert!(s.admin.call_log(admin, Some("nobody"), None).unwrap().is_empty());
}

#[tokio::test]
async fn test_parked_providers_are_listed_with_a_reason() {
    let store = Arc::new(InMemoryStateStore::new());
    let persisted = serde_json::json!({
        "providers": [
            { "name": "A", "kind": "echo" },
            { "name": "old", "kind": "retired_kind" }
        ]
    });
    store
        .save("provider_registry", persisted.to_string().as_bytes())
        .await
        .unwrap();
    let s = services_with_store(store, &[], None).await;
    let admin = Principal::admin();

    let views = s.admin.list_providers(admin, false).unwrap();
    assert_eq!(views.len(), 2);
    assert!(views[0].unavailable_reason.is_none());
    assert!(views[1].unavailable_reason.is_some());

    let old = s.admin.get_provider(admin, "old").unwrap();
    assert_eq!(old.name, "old");
    assert!(old.unavailable_reason.is_some());

    let report = s.admin.test_connectivity(admin, "old").await.unwrap();
    assert!(!report.success);

    s.admin.delete_provider(admin, "old").await.unwrap();
    assert_eq!(s.admin.list_providers(admin, false).unwrap().len(), 1);
}

#[tokio::test]
async fn test_connectivity_and_seeding_through_admin() {
    let s = services(&[echo("A", 0)]).await;
    let admin = Principal::admin();

    let report = s.admin.test_connectivity(admin, "A").await.unwrap();
    assert!(report.success);
    assert_eq!(
        s.admin.test_connectivity(admin, "zzz").await.unwrap_err().kind(),
        ErrorKind::NotFound
    );

    let created = s.admin.seed_defaults(admin).await.unwrap();
    assert_eq!(created.len(), 6);
    assert_eq!(s.admin.list_providers(admin, false).unwrap().len(), 7);
}
