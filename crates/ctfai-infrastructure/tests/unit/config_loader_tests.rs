//! Configuration Loader Tests

use std::env;
use std::fs;

use ctfai_domain::error::Error;
use ctfai_domain::value_objects::ProviderConfig;
use ctfai_infrastructure::config::{ConfigBuilder, ConfigLoader, ServerConfig, StorageBackend};
use ctfai_infrastructure::constants::{
    DEFAULT_ADMIN_HEADER, DEFAULT_FLUSH_INTERVAL_SECS, DEFAULT_HTTP_PORT, DEFAULT_LOG_LEVEL,
};
use tempfile::TempDir;

/// Loader that ignores default file locations and the real `CTFAI_` environment
fn isolated_loader(temp_dir: &TempDir, prefix: &str) -> ConfigLoader {
    ConfigLoader::new()
        .with_config_path(temp_dir.path().join("missing.toml"))
        .with_env_prefix(prefix)
}

fn write_config(temp_dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = temp_dir.path().join("ctfai.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_config_loader_default() {
    let temp_dir = TempDir::new().unwrap();
    let config = isolated_loader(&temp_dir, "CTFAI_TEST_DEFAULTS").load().unwrap();

    assert_eq!(config.server.port, DEFAULT_HTTP_PORT);
    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
    assert_eq!(config.storage.backend, StorageBackend::Filesystem);
    assert_eq!(config.usage.flush_interval_secs, DEFAULT_FLUSH_INTERVAL_SECS);
    assert_eq!(config.admin.header_name, DEFAULT_ADMIN_HEADER);
    assert!(!config.admin.enabled);
    assert!(config.providers.is_empty());
}

#[test]
fn test_config_loader_reads_toml_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
[server]
port = 9090

[generation]
default_provider = "local"
default_timeout_ms = 5000

[storage]
backend = "memory"

[[providers]]
name = "local"
kind = "echo"
priority = 5

[providers.options]
delay_ms = "1"
"#,
    );

    let config = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("CTFAI_TEST_TOML")
        .load()
        .unwrap();

    assert_eq!(config.server.port, 9090);
    assert_eq!(config.generation.default_provider.as_deref(), Some("local"));
    assert_eq!(config.generation.default_timeout_ms, 5000);
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.providers.len(), 1);
    let provider = &config.providers[0];
    assert_eq!(provider.kind, "echo");
    assert_eq!(provider.priority, 5);
    assert!(provider.enabled);
    assert_eq!(provider.options.get("delay_ms").map(String::as_str), Some("1"));
}

#[test]
fn test_environment_overrides_file_with_nested_keys() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "[server]\nport = 9090\n");

    // SAFETY: the variable names are unique to this test
    unsafe {
        env::set_var("CTFAI_TEST_ENV_SERVER__PORT", "7070");
        env::set_var("CTFAI_TEST_ENV_USAGE__FLUSH_INTERVAL_SECS", "30");
    }
    let loaded = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("CTFAI_TEST_ENV")
        .load();
    unsafe {
        env::remove_var("CTFAI_TEST_ENV_SERVER__PORT");
        env::remove_var("CTFAI_TEST_ENV_USAGE__FLUSH_INTERVAL_SECS");
    }

    let config = loaded.unwrap();
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.usage.flush_interval_secs, 30);
}

#[test]
fn test_zero_port_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "[server]\nport = 0\n");
    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("CTFAI_TEST_PORT")
        .load()
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }), "{err}");
}

#[test]
fn test_default_timeout_above_maximum_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        "[generation]\ndefault_timeout_ms = 5000\nmax_timeout_ms = 1000\n",
    );
    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("CTFAI_TEST_TIMEOUT")
        .load()
        .unwrap_err();
    assert!(err.to_string().contains("cannot exceed"), "{err}");
}

#[test]
fn test_admin_auth_requires_a_key() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "[admin]\nenabled = true\n");
    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("CTFAI_TEST_ADMIN")
        .load()
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }), "{err}");

    let path = write_config(&temp_dir, "[admin]\nenabled = true\napi_key = \"s3cret\"\n");
    let config = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("CTFAI_TEST_ADMIN")
        .load()
        .unwrap();
    assert_eq!(config.admin.api_key.as_deref(), Some("s3cret"));
}

#[test]
fn test_zero_flush_interval_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "[usage]\nflush_interval_secs = 0\n");
    assert!(
        ConfigLoader::new()
            .with_config_path(&path)
            .with_env_prefix("CTFAI_TEST_FLUSH")
            .load()
            .is_err()
    );
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "[logging]\nlevel = \"chatty\"\n");
    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("CTFAI_TEST_LEVEL")
        .load()
        .unwrap_err();
    assert!(err.to_string().contains("Invalid log level"), "{err}");
}

#[test]
fn test_duplicate_providers_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
[[providers]]
name = "a"
kind = "echo"

[[providers]]
name = "a"
kind = "echo"
"#,
    );
    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("CTFAI_TEST_DUP")
        .load()
        .unwrap_err();
    assert!(err.to_string().contains("more than once"), "{err}");
}

#[test]
fn test_serialized_config_loads_back() {
    let temp_dir = TempDir::new().unwrap();
    let original_config = ConfigBuilder::new()
        .with_server(ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 9999,
        })
        .with_memory_storage()
        .with_provider(ProviderConfig::new("local", "echo").with_priority(3))
        .with_default_provider("local")
        .build();
    let config_path = write_config(&temp_dir, &toml::to_string_pretty(&original_config).unwrap());

    let loaded_config = ConfigLoader::new()
        .with_config_path(&config_path)
        .with_env_prefix("CTFAI_TEST_SAVE")
        .load()
        .unwrap();

    assert_eq!(loaded_config.server.port, 9999);
    assert_eq!(loaded_config.server.host, "0.0.0.0");
    assert_eq!(loaded_config.storage.backend, StorageBackend::Memory);
    assert_eq!(loaded_config.providers, original_config.providers);
    assert_eq!(
        loaded_config.generation.default_provider.as_deref(),
        Some("local")
    );
}
