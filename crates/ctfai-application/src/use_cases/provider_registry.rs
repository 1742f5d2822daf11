//! Provider Registry
//!
//! Holds every configured provider together with its adapter instance.
//! Stored configs whose adapter cannot be built (an adapter kind that is no
//! longer compiled in, an endpoint a newer release rejects) are parked: they
//! stay in storage and in admin reads, but never serve calls until an
//! update makes them buildable again.
//!
//! Reads go through an [`ArcSwap`] snapshot and never wait. Writers are
//! serialized by a mutex, persist the new state through the
//! [`StateStoreProvider`] and only then publish it, so a failed write leaves
//! both the store and the in-memory view unchanged. Calls already holding a
//! [`RegisteredProvider`] keep the config and adapter they started with.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use ctfai_domain::constants::REGISTRY_STATE_KEY;
use ctfai_domain::error::{Error, Result};
use ctfai_domain::ports::{GenerationProvider, ProviderDirectory, StateStoreProvider};
use ctfai_domain::value_objects::{ConnectivityReport, ProviderConfig, ProviderPatch};

use super::deadline::DeadlinePolicy;
use crate::ports::resolve_generation_provider;
use crate::utils::TimedOperation;

/// A provider config paired with the adapter built from it
#[derive(Clone)]
pub struct RegisteredProvider {
    /// Stored config
    pub config: Arc<ProviderConfig>,
    /// Adapter instance
    pub adapter: Arc<dyn GenerationProvider>,
}

impl RegisteredProvider {
    /// Provider name
    pub fn name(&self) -> &str {
        &self.config.name
    }
}

impl fmt::Debug for RegisteredProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredProvider")
            .field("config", &self.config)
            .field("kind", &self.adapter.provider_kind())
            .finish()
    }
}

/// A stored provider config as administrators see it
#[derive(Debug, Clone)]
pub struct StoredProvider {
    /// Stored config
    pub config: Arc<ProviderConfig>,
    /// Why no adapter could be built from the config, if it is parked
    pub unavailable_reason: Option<String>,
}

#[derive(Clone)]
struct ParkedProvider {
    config: Arc<ProviderConfig>,
    reason: String,
}

#[derive(Clone, Default)]
struct RegistryState {
    providers: BTreeMap<String, RegisteredProvider>,
    parked: BTreeMap<String, ParkedProvider>,
    default_provider: Option<String>,
}

impl RegistryState {
    fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name) || self.parked.contains_key(name)
    }

    fn stored_config(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers
            .get(name)
            .map(|p| p.config.as_ref())
            .or_else(|| self.parked.get(name).map(|p| p.config.as_ref()))
    }

    fn stored(&self, name: &str) -> Option<StoredProvider> {
        if let Some(entry) = self.providers.get(name) {
            return Some(StoredProvider {
                config: Arc::clone(&entry.config),
                unavailable_reason: None,
            });
        }
        self.parked.get(name).map(|p| StoredProvider {
            config: Arc::clone(&p.config),
            unavailable_reason: Some(p.reason.clone()),
        })
    }

    /// Name default routing picks: the configured default when it exists,
    /// otherwise the enabled provider with the highest priority
    fn default_name(&self) -> Option<&str> {
        if let Some(name) = &self.default_provider
            && self.contains(name)
        {
            return Some(name.as_str());
        }
        self.providers
            .values()
            .filter(|p| p.config.enabled)
            .max_by(|a, b| {
                a.config
                    .priority
                    .cmp(&b.config.priority)
                    .then_with(|| b.config.name.cmp(&a.config.name))
            })
            .map(RegisteredProvider::name)
    }

    fn persisted(&self) -> PersistedRegistry {
        let mut configs: BTreeMap<&str, &ProviderConfig> = self
            .parked
            .iter()
            .map(|(name, p)| (name.as_str(), p.config.as_ref()))
            .collect();
        configs.extend(
            self.providers
                .iter()
                .map(|(name, p)| (name.as_str(), p.config.as_ref())),
        );
        PersistedRegistry {
            providers: configs.into_values().cloned().collect(),
            default_provider: self.default_provider.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedRegistry {
    providers: Vec<ProviderConfig>,
    #[serde(default)]
    default_provider: Option<String>,
}

struct CatalogueEntry {
    name: &'static str,
    display_name: &'static str,
    kind: &'static str,
    endpoint: &'static str,
    model: &'static str,
    priority: i32,
}

/// Well-known providers created by [`ProviderRegistry::seed_defaults`]
const DEFAULT_CATALOGUE: &[CatalogueEntry] = &[
    CatalogueEntry {
        name: "openai",
        display_name: "OpenAI GPT",
        kind: "openai",
        endpoint: "https://api.openai.com/v1",
        model: "gpt-4o-mini",
        priority: 100,
    },
    CatalogueEntry {
        name: "deepseek",
        display_name: "DeepSeek",
        kind: "openai",
        endpoint: "https://api.deepseek.com/v1",
        model: "deepseek-chat",
        priority: 90,
    },
    CatalogueEntry {
        name: "ernie_bot",
        display_name: "Baidu ERNIE Bot",
        kind: "openai",
        endpoint: "https://qianfan.baidubce.com/v2",
        model: "ernie-4.0-8k",
        priority: 80,
    },
    CatalogueEntry {
        name: "tongyi_qianwen",
        display_name: "Alibaba Tongyi Qianwen",
        kind: "openai",
        endpoint: "https://dashscope.aliyuncs.com/compatible-mode/v1",
        model: "qwen-turbo",
        priority: 70,
    },
    CatalogueEntry {
        name: "zhipu_ai",
        display_name: "Zhipu AI GLM",
        kind: "openai",
        endpoint: "https://open.bigmodel.cn/api/paas/v4",
        model: "glm-4",
        priority: 60,
    },
    CatalogueEntry {
        name: "google",
        display_name: "Google Gemini",
        kind: "gemini",
        endpoint: "https://generativelanguage.googleapis.com/v1beta",
        model: "gemini-1.5-flash",
        priority: 50,
    },
];

/// Shared registry of configured providers
pub struct ProviderRegistry {
    state: ArcSwap<RegistryState>,
    writer: Mutex<()>,
    store: Arc<dyn StateStoreProvider>,
    deadlines: DeadlinePolicy,
}

impl ProviderRegistry {
    /// Create an empty registry persisting through `store`
    pub fn new(store: Arc<dyn StateStoreProvider>, deadlines: DeadlinePolicy) -> Self {
        Self {
            state: ArcSwap::from_pointee(RegistryState::default()),
            writer: Mutex::new(()),
            store,
            deadlines,
        }
    }

    /// Load the persisted registry, or apply `initial` when nothing was persisted
    ///
    /// Persisted configs whose adapter can no longer be built are parked with
    /// a warning. Invalid `initial` configs fail the call.
    pub async fn hydrate(
        &self,
        initial: &[ProviderConfig],
        default_provider: Option<&str>,
    ) -> Result<()> {
        let _guard = self.writer.lock().await;

        if let Some(data) = self.store.load(REGISTRY_STATE_KEY).await? {
            let persisted: PersistedRegistry = serde_json::from_slice(&data)?;
            let mut state = RegistryState {
                default_provider: persisted.default_provider,
                ..RegistryState::default()
            };
            for config in persisted.providers {
                let config = Arc::new(config);
                match build(config.as_ref().clone()) {
                    Ok(entry) => {
                        state.providers.insert(entry.config.name.clone(), entry);
                    }
                    Err(e) => {
                        warn!(provider = %config.name, error = %e, "Parking persisted provider");
                        state.parked.insert(
                            config.name.clone(),
                            ParkedProvider {
                                config,
                                reason: e.to_string(),
                            },
                        );
                    }
                }
            }
            info!(
                providers = state.providers.len(),
                parked = state.parked.len(),
                "Provider registry loaded from state store"
            );
            self.state.store(Arc::new(state));
            return Ok(());
        }

        let mut state = RegistryState {
            default_provider: default_provider.map(str::to_string),
            ..RegistryState::default()
        };
        for config in initial {
            let entry = build(config.clone())?;
            state.providers.insert(entry.config.name.clone(), entry);
        }
        self.persist(&state).await?;
        info!(
            providers = state.providers.len(),
            "Provider registry initialized from configuration"
        );
        self.state.store(Arc::new(state));
        Ok(())
    }

    /// All provider configs ordered by name
    pub fn list(&self) -> Vec<Arc<ProviderConfig>> {
        self.state
            .load()
            .providers
            .values()
            .map(|p| Arc::clone(&p.config))
            .collect()
    }

    /// Names of enabled providers ordered by name
    pub fn list_enabled(&self) -> Vec<String> {
        self.state
            .load()
            .providers
            .values()
            .filter(|p| p.config.enabled)
            .map(|p| p.config.name.clone())
            .collect()
    }

    /// Config of the named provider
    pub fn get(&self, name: &str) -> Result<Arc<ProviderConfig>> {
        self.registered(name).map(|p| p.config)
    }

    /// Every stored config, parked ones included, ordered by name
    pub fn stored(&self) -> Vec<StoredProvider> {
        let state = self.state.load();
        let mut names: Vec<&String> = state.providers.keys().chain(state.parked.keys()).collect();
        names.sort();
        names
            .into_iter()
            .filter_map(|name| state.stored(name))
            .collect()
    }

    /// One stored config, parked or not
    pub fn stored_one(&self, name: &str) -> Result<StoredProvider> {
        self.state
            .load()
            .stored(name)
            .ok_or_else(|| Error::not_found(format!("provider '{name}'")))
    }

    /// Config and adapter of the named provider
    pub fn registered(&self, name: &str) -> Result<RegisteredProvider> {
        self.state
            .load()
            .providers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("provider '{name}'")))
    }

    /// Name default routing currently picks, if any
    pub fn default_provider(&self) -> Option<String> {
        self.state.load().default_name().map(str::to_string)
    }

    /// Pick the provider for a call
    ///
    /// An explicit name must exist (`NoProviderAvailable`) and be enabled
    /// (`ProviderDisabled`). Without one the default is used, which must
    /// exist and be enabled (`NoProviderAvailable`).
    pub fn resolve(&self, explicit: Option<&str>) -> Result<RegisteredProvider> {
        let state = self.state.load();

        if let Some(name) = explicit {
            if let Some(parked) = state.parked.get(name) {
                return Err(Error::no_provider_available(format!(
                    "provider '{name}' is unavailable: {}",
                    parked.reason
                )));
            }
            let entry = state.providers.get(name).ok_or_else(|| {
                Error::no_provider_available(format!("provider '{name}' is not configured"))
            })?;
            if !entry.config.enabled {
                return Err(Error::provider_disabled(name));
            }
            return Ok(entry.clone());
        }

        let name = state
            .default_name()
            .ok_or_else(|| Error::no_provider_available("no enabled provider is configured"))?;
        match state.providers.get(name) {
            Some(entry) if entry.config.enabled => Ok(entry.clone()),
            _ => Err(Error::no_provider_available(format!(
                "default provider '{name}' is disabled or unavailable"
            ))),
        }
    }

    /// Create or replace a provider config
    ///
    /// The adapter is rebuilt from the new config; an unknown kind or an
    /// invalid endpoint fails with `InvalidConfig`. When `api_key` is absent
    /// the stored key is kept; an empty key clears it.
    pub async fn upsert(&self, config: ProviderConfig) -> Result<Arc<ProviderConfig>> {
        let _guard = self.writer.lock().await;
        self.write_entry(config).await
    }

    /// Create a provider config; fails with `InvalidConfig` if the name exists
    pub async fn create(&self, config: ProviderConfig) -> Result<Arc<ProviderConfig>> {
        let _guard = self.writer.lock().await;
        if self.state.load().contains(&config.name) {
            return Err(Error::invalid_config(format!(
                "provider '{}' already exists",
                config.name
            )));
        }
        self.write_entry(config).await
    }

    /// Apply a partial update to the config stored when the writer lock is held
    ///
    /// Concurrent patches of one provider apply one after the other, each on
    /// top of the previous result. Fails with `NotFound` if missing and with
    /// `InvalidConfig` if the patch renames the provider.
    pub async fn patch(&self, name: &str, patch: ProviderPatch) -> Result<Arc<ProviderConfig>> {
        let _guard = self.writer.lock().await;
        let current = self
            .state
            .load()
            .stored_config(name)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("provider '{name}'")))?;
        let config = patch.apply(current)?;
        self.write_entry(config).await
    }

    async fn write_entry(&self, mut config: ProviderConfig) -> Result<Arc<ProviderConfig>> {
        let current = self.state.load_full();

        if config.api_key.is_none() {
            if let Some(existing) = current.stored_config(&config.name) {
                config.api_key.clone_from(&existing.api_key);
            }
        } else if !config.has_api_key() {
            config.api_key = None;
        }

        let entry = build(config)?;
        let stored = Arc::clone(&entry.config);

        let mut next = current.as_ref().clone();
        next.parked.remove(&stored.name);
        next.providers.insert(stored.name.clone(), entry);
        self.persist(&next).await?;
        self.state.store(Arc::new(next));

        info!(provider = %stored.name, kind = %stored.kind, enabled = stored.enabled, "Provider saved");
        Ok(stored)
    }

    /// Remove a provider; fails with `NotFound` if missing
    pub async fn remove(&self, name: &str) -> Result<()> {
        let _guard = self.writer.lock().await;
        let current = self.state.load_full();
        if !current.contains(name) {
            return Err(Error::not_found(format!("provider '{name}'")));
        }

        let mut next = current.as_ref().clone();
        next.providers.remove(name);
        next.parked.remove(name);
        if next.default_provider.as_deref() == Some(name) {
            next.default_provider = None;
        }
        self.persist(&next).await?;
        self.state.store(Arc::new(next));

        info!(provider = %name, "Provider removed");
        Ok(())
    }

    /// Make `name` the configured default; fails with `NotFound` if missing
    pub async fn set_default(&self, name: &str) -> Result<()> {
        let _guard = self.writer.lock().await;
        let current = self.state.load_full();
        if !current.contains(name) {
            return Err(Error::not_found(format!("provider '{name}'")));
        }

        let mut next = current.as_ref().clone();
        next.default_provider = Some(name.to_string());
        self.persist(&next).await?;
        self.state.store(Arc::new(next));

        info!(provider = %name, "Default provider changed");
        Ok(())
    }

    /// Insert the well-known provider catalogue
    ///
    /// Entries are created disabled and without credentials; names that
    /// already exist are left untouched. Returns the names created.
    pub async fn seed_defaults(&self) -> Result<Vec<String>> {
        let _guard = self.writer.lock().await;
        let current = self.state.load_full();
        let mut next = current.as_ref().clone();
        let mut created = Vec::new();

        for item in DEFAULT_CATALOGUE {
            if next.contains(item.name) {
                continue;
            }
            let config = ProviderConfig::new(item.name, item.kind)
                .with_display_name(item.display_name)
                .with_endpoint(item.endpoint)
                .with_model(item.model)
                .with_priority(item.priority)
                .with_enabled(false);
            let entry = build(config)?;
            next.providers.insert(item.name.to_string(), entry);
            created.push(item.name.to_string());
        }

        if !created.is_empty() {
            self.persist(&next).await?;
            self.state.store(Arc::new(next));
            info!(created = ?created, "Default providers seeded");
        }
        Ok(created)
    }

    /// Round-trip the provider's adapter without generating anything
    ///
    /// Works for disabled providers and never touches usage statistics. A
    /// parked provider reports a failure without being contacted.
    pub async fn test_connectivity(&self, name: &str) -> Result<ConnectivityReport> {
        if let Some(reason) = self.stored_one(name)?.unavailable_reason {
            return Ok(ConnectivityReport {
                provider: name.to_string(),
                success: false,
                latency_ms: 0,
                error: Some(reason),
            });
        }
        let entry = self.registered(name)?;
        let timeout_ms = self.deadlines.resolve_ms(None, entry.config.timeout_ms);
        let deadline = self.deadlines.resolve(None, entry.config.timeout_ms);

        let timer = TimedOperation::start();
        let error = match tokio::time::timeout(deadline, entry.adapter.ping(deadline)).await {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(_) => Some(Error::timeout(timeout_ms).to_string()),
        };
        let latency_ms = timer.elapsed_ms();

        info!(provider = %name, success = error.is_none(), latency_ms, "Connectivity test finished");
        Ok(ConnectivityReport {
            provider: name.to_string(),
            success: error.is_none(),
            latency_ms,
            error,
        })
    }

    async fn persist(&self, state: &RegistryState) -> Result<()> {
        let data = serde_json::to_vec(&state.persisted())?;
        self.store.save(REGISTRY_STATE_KEY, &data).await
    }
}

impl ProviderDirectory for ProviderRegistry {
    fn contains(&self, name: &str) -> bool {
        self.state.load().contains(name)
    }
}

fn build(config: ProviderConfig) -> Result<RegisteredProvider> {
    config.validate()?;
    let adapter = resolve_generation_provider(&config).map_err(|e| {
        Error::invalid_config(format!("provider '{}': {e}", config.name))
    })?;
    Ok(RegisteredProvider {
        config: Arc::new(config),
        adapter,
    })
}
