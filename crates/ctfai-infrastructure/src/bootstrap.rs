//! Application bootstrap
//!
//! Composition root: builds the state store, hydrates the provider registry,
//! restores usage statistics and wires the router, comparison engine and
//! admin service on top of them.
//!
//! ```text
//! AppConfig → StateStore → ProviderRegistry ─┬→ GenerationRouter → ComparisonEngine
//!                  │              │           │
//!                  └→ UsageStatsAggregator ───┴→ AdminConfigService
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let context = init_app(config).await?;
//! let flusher = context.start_usage_flusher(shutdown.clone());
//! // ... serve requests ...
//! shutdown.cancel();
//! flusher.await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use ctfai_application::use_cases::{
    AdminConfigService, ComparisonEngine, DeadlinePolicy, GenerationRouter, ProviderRegistry,
    UsageStatsAggregator,
};
use ctfai_application::ports::UsageStatsInterface;
use ctfai_domain::error::Result;
use ctfai_domain::ports::{ProviderDirectory, StateStoreProvider};
use ctfai_providers::{FilesystemStateStore, InMemoryStateStore};

use crate::config::{AppConfig, StorageBackend, StorageConfig};
use crate::usage_flusher::UsageFlusher;

/// Wired services shared by every request
pub struct AppContext {
    config: Arc<AppConfig>,
    store: Arc<dyn StateStoreProvider>,
    registry: Arc<ProviderRegistry>,
    stats: Arc<UsageStatsAggregator>,
    router: Arc<GenerationRouter>,
    engine: Arc<ComparisonEngine>,
    admin: Arc<AdminConfigService>,
}

impl AppContext {
    /// Loaded configuration
    pub fn config(&self) -> Arc<AppConfig> {
        Arc::clone(&self.config)
    }

    /// State store backing the registry and statistics
    pub fn state_store(&self) -> Arc<dyn StateStoreProvider> {
        Arc::clone(&self.store)
    }

    /// Provider registry
    pub fn registry(&self) -> Arc<ProviderRegistry> {
        Arc::clone(&self.registry)
    }

    /// Usage statistics aggregator
    pub fn usage_stats(&self) -> Arc<UsageStatsAggregator> {
        Arc::clone(&self.stats)
    }

    /// Single-provider generation service
    pub fn router(&self) -> Arc<GenerationRouter> {
        Arc::clone(&self.router)
    }

    /// Multi-provider comparison service
    pub fn comparison_engine(&self) -> Arc<ComparisonEngine> {
        Arc::clone(&self.engine)
    }

    /// Admin configuration service
    pub fn admin(&self) -> Arc<AdminConfigService> {
        Arc::clone(&self.admin)
    }

    /// Spawn the background usage statistics flusher
    ///
    /// The task flushes changed counters every `usage.flush_interval_secs`
    /// and once more when `shutdown` is cancelled.
    pub fn start_usage_flusher(&self, shutdown: CancellationToken) -> JoinHandle<()> {
        let interval = Duration::from_secs(self.config.usage.flush_interval_secs);
        UsageFlusher::new(self.usage_stats(), self.state_store(), interval).spawn(shutdown)
    }

    /// Persist usage statistics if they changed since the last flush
    pub async fn flush_usage_stats(&self) -> Result<bool> {
        UsageFlusher::flush_if_dirty(&self.stats, self.store.as_ref()).await
    }
}

/// Build the state store selected by `storage`
pub fn build_state_store(storage: &StorageConfig) -> Arc<dyn StateStoreProvider> {
    match storage.backend {
        StorageBackend::Filesystem => {
            Arc::new(FilesystemStateStore::new(storage.data_dir.clone()))
        }
        StorageBackend::Memory => Arc::new(InMemoryStateStore::new()),
    }
}

/// Initialize the application context from configuration
///
/// Config-file providers only seed an empty state store; once a registry
/// snapshot exists it wins.
pub async fn init_app(config: AppConfig) -> Result<AppContext> {
    let store = build_state_store(&config.storage);
    init_app_with_store(config, store).await
}

/// Initialize the application context over an existing state store
pub async fn init_app_with_store(
    config: AppConfig,
    store: Arc<dyn StateStoreProvider>,
) -> Result<AppContext> {
    info!(
        storage = %config.storage.backend,
        providers = config.providers.len(),
        "Initializing application context"
    );
    let config = Arc::new(config);
    let deadlines = DeadlinePolicy::new(
        config.generation.default_timeout_ms,
        config.generation.max_timeout_ms,
    );

    let registry = Arc::new(ProviderRegistry::new(Arc::clone(&store), deadlines));
    registry
        .hydrate(
            &config.providers,
            config.generation.default_provider.as_deref(),
        )
        .await?;

    let directory: Arc<dyn ProviderDirectory> = registry.clone();
    let stats = Arc::new(UsageStatsAggregator::with_directory(directory));
    match stats.restore(store.as_ref()).await {
        Ok(buckets) => info!(buckets, "Usage statistics restored"),
        Err(e) => warn!(error = %e, "Discarding unreadable usage statistics"),
    }

    let recorder: Arc<dyn UsageStatsInterface> = stats.clone();
    let router = Arc::new(GenerationRouter::new(
        Arc::clone(&registry),
        Arc::clone(&recorder),
        deadlines,
    ));
    let engine = Arc::new(ComparisonEngine::new(Arc::clone(&router)));
    let admin = Arc::new(AdminConfigService::new(Arc::clone(&registry), recorder));

    info!(
        providers = registry.list().len(),
        default_provider = registry.default_provider().as_deref().unwrap_or("<none>"),
        "Application context ready"
    );

    Ok(AppContext {
        config,
        store,
        registry,
        stats,
        router,
        engine,
        admin,
    })
}
