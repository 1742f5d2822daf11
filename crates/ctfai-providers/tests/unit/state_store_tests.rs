//! Tests for state store implementations

use std::fs;
use std::path::Path;
use std::sync::Arc;

use ctfai_domain::ports::StateStoreProvider;
use ctfai_providers::{FilesystemStateStore, InMemoryStateStore};
use tempfile::TempDir;

#[tokio::test]
async fn test_filesystem_store_roundtrip_and_overwrite() {
    let dir = TempDir::new().unwrap();
    let store = FilesystemStateStore::new(dir.path().join("state"));

    assert_eq!(store.load("provider_registry").await.unwrap(), None);

    store.save("provider_registry", b"{\"v\":1}").await.unwrap();
    store.save("provider_registry", b"{\"v\":2}").await.unwrap();
    assert_eq!(
        store.load("provider_registry").await.unwrap(),
        Some(b"{\"v\":2}".to_vec())
    );

    let names: Vec<String> = std::fs::read_dir(store.base_dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["provider_registry.json".to_string()]);
}

#[tokio::test]
async fn test_filesystem_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    FilesystemStateStore::new(dir.path())
        .save("usage_stats", b"[]")
        .await
        .unwrap();

    let reopened = FilesystemStateStore::new(dir.path());
    assert_eq!(
        reopened.load("usage_stats").await.unwrap(),
        Some(b"[]".to_vec())
    );
}

#[tokio::test]
async fn test_filesystem_store_delete_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = FilesystemStateStore::new(dir.path());
    store.save("k", b"1").await.unwrap();
    store.delete("k").await.unwrap();
    store.delete("k").await.unwrap();
    assert_eq!(store.load("k").await.unwrap(), None);
}

#[tokio::test]
async fn test_filesystem_store_rejects_path_like_keys() {
    let dir = TempDir::new().unwrap();
    let store = FilesystemStateStore::new(dir.path());
    assert!(store.save("../escape", b"x").await.is_err());
    assert!(store.load("").await.is_err());
}

fn leftover_temp_files(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_filesystem_store_concurrent_saves_of_one_key() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FilesystemStateStore::new(dir.path()));

    let writers: Vec<_> = (0..16)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let payload = format!("{{\"writer\":{i},\"pad\":\"{}\"}}", "x".repeat(4096));
                store.save("shared", payload.as_bytes()).await
            })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap().unwrap();
    }

    let data = store.load("shared").await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&data).unwrap();
    assert!(value["writer"].as_u64().unwrap() < 16);
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[tokio::test]
async fn test_filesystem_store_failed_save_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let store = FilesystemStateStore::new(dir.path());
    // A directory where the state file should go makes the rename fail
    fs::create_dir_all(dir.path().join("blocked.json").join("inner")).unwrap();

    assert!(store.save("blocked", b"{}").await.is_err());
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[tokio::test]
async fn test_memory_store_roundtrip() {
    let store = InMemoryStateStore::new();
    assert!(store.is_empty());
    store.save("a", b"1").await.unwrap();
    assert_eq!(store.load("a").await.unwrap(), Some(b"1".to_vec()));
    assert_eq!(store.len(), 1);
    store.delete("a").await.unwrap();
    assert_eq!(store.load("a").await.unwrap(), None);
}
