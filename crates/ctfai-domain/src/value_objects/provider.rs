//! Provider configuration value objects

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_PROVIDER_MAX_TOKENS, DEFAULT_PROVIDER_TEMPERATURE, PROVIDER_NAME_MAX_LEN,
};
use crate::error::{Error, Result};

fn default_enabled() -> bool {
    true
}

fn default_max_tokens() -> u32 {
    DEFAULT_PROVIDER_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_PROVIDER_TEMPERATURE
}

/// Stored configuration of one AI provider
///
/// `api_key` is persisted but never leaves the service through a read
/// API; see [`ProviderView`].
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Unique, immutable name
    pub name: String,
    /// Human readable name shown in the admin console
    #[serde(default)]
    pub display_name: Option<String>,
    /// Registered adapter kind (`openai`, `gemini`, `ollama`, `echo`, ...)
    pub kind: String,
    /// API base URL; the adapter default applies when absent
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Model identifier; the adapter default applies when absent
    #[serde(default)]
    pub model: Option<String>,
    /// Secret credential
    #[serde(default)]
    pub api_key: Option<String>,
    /// Whether the provider may be selected
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Default token budget for this provider
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Default sampling temperature for this provider
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Deadline used when the call does not carry one
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Higher priority wins when picking an implicit default
    #[serde(default)]
    pub priority: i32,
    /// Adapter specific options
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl ProviderConfig {
    /// Create a config with the given name and adapter kind
    pub fn new<N: Into<String>, K: Into<String>>(name: N, kind: K) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            kind: kind.into(),
            endpoint: None,
            model: None,
            api_key: None,
            enabled: true,
            max_tokens: DEFAULT_PROVIDER_MAX_TOKENS,
            temperature: DEFAULT_PROVIDER_TEMPERATURE,
            timeout_ms: None,
            priority: 0,
            options: BTreeMap::new(),
        }
    }

    /// Set the display name
    pub fn with_display_name<S: Into<String>>(mut self, display_name: S) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Set the endpoint URL
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the model
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the API key
    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the enabled flag
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the per-provider deadline
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Add an adapter option
    pub fn with_option<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Display name, falling back to the provider name
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Whether a non-empty API key is stored
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Whether a non-empty endpoint is stored
    pub fn has_endpoint(&self) -> bool {
        self.endpoint.as_deref().is_some_and(|e| !e.trim().is_empty())
    }

    /// Check the attributes the registry can verify without an adapter
    ///
    /// Adapter kind and endpoint syntax are checked by the adapter factory.
    pub fn validate(&self) -> Result<()> {
        validate_provider_name(&self.name)?;
        if self.kind.trim().is_empty() {
            return Err(Error::invalid_config("adapter kind cannot be empty"));
        }
        if self.max_tokens == 0 {
            return Err(Error::invalid_config("max_tokens must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::invalid_config(
                "temperature must be between 0 and 2",
            ));
        }
        if self.timeout_ms == Some(0) {
            return Err(Error::invalid_config("timeout_ms must be greater than 0"));
        }
        Ok(())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("enabled", &self.enabled)
            .field("priority", &self.priority)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

/// Validate a provider name
///
/// Names are non-empty, at most 64 characters, and use only ASCII
/// alphanumerics, `_` and `-`.
pub fn validate_provider_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_config("provider name cannot be empty"));
    }
    if name.len() > PROVIDER_NAME_MAX_LEN {
        return Err(Error::invalid_config(format!(
            "provider name cannot exceed {PROVIDER_NAME_MAX_LEN} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::invalid_config(format!(
            "provider name '{name}' may only contain letters, digits, '_' and '-'"
        )));
    }
    Ok(())
}

/// Partial update of a provider config
///
/// Absent fields keep their stored value. An empty `endpoint` or `model`
/// clears it; an empty `api_key` clears the stored secret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderPatch {
    /// Must match the target name when given
    #[serde(default)]
    pub name: Option<String>,
    /// New display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// New adapter kind
    #[serde(default)]
    pub kind: Option<String>,
    /// New endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
    /// New model
    #[serde(default)]
    pub model: Option<String>,
    /// New secret
    #[serde(default)]
    pub api_key: Option<String>,
    /// New enabled flag
    #[serde(default)]
    pub enabled: Option<bool>,
    /// New token budget
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// New temperature
    #[serde(default)]
    pub temperature: Option<f32>,
    /// New per-provider deadline
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// New priority
    #[serde(default)]
    pub priority: Option<i32>,
    /// Replacement adapter options
    #[serde(default)]
    pub options: Option<BTreeMap<String, String>>,
}

impl ProviderPatch {
    /// Apply the patch to `config`
    ///
    /// Fails with `InvalidConfig` when the patch tries to rename the provider.
    pub fn apply(self, mut config: ProviderConfig) -> Result<ProviderConfig> {
        if let Some(name) = self.name
            && name.trim() != config.name
        {
            return Err(Error::invalid_config(format!(
                "provider name is immutable ('{}' cannot become '{}')",
                config.name,
                name.trim()
            )));
        }
        if let Some(display_name) = self.display_name {
            config.display_name = non_blank(display_name);
        }
        if let Some(kind) = self.kind {
            config.kind = kind.trim().to_string();
        }
        if let Some(endpoint) = self.endpoint {
            config.endpoint = non_blank(endpoint);
        }
        if let Some(model) = self.model {
            config.model = non_blank(model);
        }
        if let Some(api_key) = self.api_key {
            config.api_key = Some(api_key);
        }
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = Some(timeout_ms);
        }
        if let Some(priority) = self.priority {
            config.priority = priority;
        }
        if let Some(options) = self.options {
            config.options = options;
        }
        Ok(config)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Read view of a provider config, safe to return to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderView {
    /// Provider name
    pub name: String,
    /// Display name
    pub display_name: String,
    /// Adapter kind
    pub kind: String,
    /// Configured model
    pub model: Option<String>,
    /// Enabled flag
    pub enabled: bool,
    /// Whether a credential is stored
    pub api_key_configured: bool,
    /// Whether an explicit endpoint is stored
    pub api_base_configured: bool,
    /// Priority
    pub priority: i32,
    /// Per-provider deadline
    pub timeout_ms: Option<u64>,
    /// Default token budget
    pub max_tokens: u32,
    /// Default temperature
    pub temperature: f32,
    /// Whether this provider is the one default routing currently picks
    pub is_default: bool,
    /// Why the stored config has no working adapter; such providers are
    /// kept in storage but cannot serve calls until fixed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unavailable_reason: Option<String>,
}

impl ProviderView {
    /// Build the view of a config
    pub fn from_config(config: &ProviderConfig, is_default: bool) -> Self {
        Self {
            name: config.name.clone(),
            display_name: config.display_name().to_string(),
            kind: config.kind.clone(),
            model: config.model.clone(),
            enabled: config.enabled,
            api_key_configured: config.has_api_key(),
            api_base_configured: config.has_endpoint(),
            priority: config.priority,
            timeout_ms: config.timeout_ms,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            is_default,
            unavailable_reason: None,
        }
    }

    /// Mark the view as backed by a config whose adapter cannot be built
    pub fn with_unavailable_reason<S: Into<String>>(mut self, reason: S) -> Self {
        self.unavailable_reason = Some(reason.into());
        self
    }
}

/// Outcome of a connectivity test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityReport {
    /// Tested provider
    pub provider: String,
    /// Whether the round-trip succeeded
    pub success: bool,
    /// Round-trip latency
    pub latency_ms: u64,
    /// Failure detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
