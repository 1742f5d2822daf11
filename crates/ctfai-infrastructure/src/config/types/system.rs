//! Generation, storage, usage and admin configuration types

use crate::constants::*;
use ctfai_domain::constants::{DEFAULT_GENERATION_TIMEOUT_MS, MAX_GENERATION_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Generation deadlines and default routing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Provider used when a request names none
    ///
    /// When unset, the enabled provider with the highest priority is used.
    pub default_provider: Option<String>,

    /// Deadline applied when neither the call nor the provider sets one
    pub default_timeout_ms: u64,

    /// Upper bound for any resolved deadline
    pub max_timeout_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_provider: None,
            default_timeout_ms: DEFAULT_GENERATION_TIMEOUT_MS,
            max_timeout_ms: MAX_GENERATION_TIMEOUT_MS,
        }
    }
}

/// State store implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON documents under `data_dir`
    #[default]
    Filesystem,
    /// Process memory; nothing survives a restart
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filesystem => write!(f, "filesystem"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Persistence of provider configs and usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// State store implementation
    pub backend: StorageBackend,

    /// Directory of the filesystem store
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|d| d.join(DEFAULT_CONFIG_DIR))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        Self {
            backend: StorageBackend::default(),
            data_dir,
        }
    }
}

/// Usage statistics persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    /// Seconds between background flushes of changed counters
    pub flush_interval_secs: u64,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            flush_interval_secs: DEFAULT_FLUSH_INTERVAL_SECS,
        }
    }
}

/// Admin API authorization
///
/// When disabled every caller of the admin API is treated as an admin.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Require the admin key header
    pub enabled: bool,

    /// Name of the header carrying the key
    pub header_name: String,

    /// Expected key
    pub api_key: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            header_name: DEFAULT_ADMIN_HEADER.to_string(),
            api_key: None,
        }
    }
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("enabled", &self.enabled)
            .field("header_name", &self.header_name)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
