//! Main application configuration

use ctfai_domain::value_objects::ProviderConfig;
use serde::{Deserialize, Serialize};

pub use super::logging::LoggingConfig;
pub use super::server::ServerConfig;
pub use super::system::{AdminConfig, GenerationConfig, StorageConfig, UsageConfig};

/// Root configuration of the service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server
    pub server: ServerConfig,

    /// Logging
    pub logging: LoggingConfig,

    /// Deadlines and default routing
    pub generation: GenerationConfig,

    /// State store
    pub storage: StorageConfig,

    /// Usage statistics persistence
    pub usage: UsageConfig,

    /// Admin API authorization
    pub admin: AdminConfig,

    /// Providers registered at first start
    ///
    /// Ignored once the state store holds a registry snapshot.
    pub providers: Vec<ProviderConfig>,
}
