//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables,
//! and default values.

use crate::config::{AppConfig, GenerationConfig, LoggingConfig, ServerConfig};
use crate::constants::*;
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use ctfai_domain::error::{Error, Result};
use ctfai_domain::value_objects::ProviderConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (explicit path, or the first default location found)
    /// 3. Environment variables with prefix, nested keys split on `__`
    ///    (e.g. `CTFAI_SERVER__PORT`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
            dirs::home_dir().map(|d| {
                d.join(format!(".{DEFAULT_CONFIG_DIR}"))
                    .join(DEFAULT_CONFIG_FILENAME)
            }),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_server_config(&config.server)?;
    validate_logging_config(&config.logging)?;
    validate_generation_config(&config.generation)?;
    validate_usage_config(config)?;
    validate_admin_config(config)?;
    validate_providers_config(&config.providers)?;
    Ok(())
}

fn validate_server_config(server: &ServerConfig) -> Result<()> {
    if server.port == 0 {
        return Err(Error::config("Server port cannot be 0"));
    }
    if server.host.trim().is_empty() {
        return Err(Error::config("Server host cannot be empty"));
    }
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> Result<()> {
    parse_log_level(&logging.level).map(|_| ())
}

fn validate_generation_config(generation: &GenerationConfig) -> Result<()> {
    if generation.default_timeout_ms == 0 || generation.max_timeout_ms == 0 {
        return Err(Error::config("Generation timeouts cannot be 0"));
    }
    if generation.default_timeout_ms > generation.max_timeout_ms {
        return Err(Error::config(format!(
            "Default generation timeout ({} ms) cannot exceed the maximum ({} ms)",
            generation.default_timeout_ms, generation.max_timeout_ms
        )));
    }
    Ok(())
}

fn validate_usage_config(config: &AppConfig) -> Result<()> {
    if config.usage.flush_interval_secs == 0 {
        return Err(Error::config("Usage flush interval cannot be 0"));
    }
    Ok(())
}

fn validate_admin_config(config: &AppConfig) -> Result<()> {
    let admin = &config.admin;
    if !admin.enabled {
        return Ok(());
    }
    if admin.header_name.trim().is_empty() {
        return Err(Error::config("Admin header name cannot be empty"));
    }
    if admin.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
        return Err(Error::config(
            "Admin API key is required when admin authorization is enabled",
        ));
    }
    Ok(())
}

fn validate_providers_config(providers: &[ProviderConfig]) -> Result<()> {
    let mut names = HashSet::new();
    for provider in providers {
        provider
            .validate()
            .map_err(|e| Error::config(format!("Provider '{}': {e}", provider.name)))?;
        if !names.insert(provider.name.as_str()) {
            return Err(Error::config(format!(
                "Provider '{}' is configured more than once",
                provider.name
            )));
        }
    }
    Ok(())
}

/// Programmatic construction of an [`AppConfig`]
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Start from the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server configuration
    pub fn with_server(mut self, server: ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    /// Set the logging configuration
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Set the generation configuration
    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.config.generation = generation;
        self
    }

    /// Use the in-memory state store
    pub fn with_memory_storage(mut self) -> Self {
        self.config.storage.backend = crate::config::StorageBackend::Memory;
        self
    }

    /// Use the filesystem state store rooted at `data_dir`
    pub fn with_data_dir<P: Into<PathBuf>>(mut self, data_dir: P) -> Self {
        self.config.storage.backend = crate::config::StorageBackend::Filesystem;
        self.config.storage.data_dir = data_dir.into();
        self
    }

    /// Require `api_key` on admin requests
    pub fn with_admin_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.config.admin.enabled = true;
        self.config.admin.api_key = Some(api_key.into());
        self
    }

    /// Add an initial provider
    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.config.providers.push(provider);
        self
    }

    /// Set the default provider
    pub fn with_default_provider<S: Into<String>>(mut self, name: S) -> Self {
        self.config.generation.default_provider = Some(name.into());
        self
    }

    /// Finish building
    pub fn build(self) -> AppConfig {
        self.config
    }
}
