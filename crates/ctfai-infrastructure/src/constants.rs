//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Domain-specific constants are defined in `ctfai_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "ctfai.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "ctfai";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "CTFAI";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// SERVER CONSTANTS
// ============================================================================

/// Default HTTP server port
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default HTTP server host
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

// ============================================================================
// ADMIN CONSTANTS
// ============================================================================

/// Header carrying the admin key
pub const DEFAULT_ADMIN_HEADER: &str = "X-Admin-Key";

// ============================================================================
// STORAGE CONSTANTS
// ============================================================================

/// Directory used for persisted state when no platform data dir exists
pub const DEFAULT_DATA_DIR: &str = "data";

/// Interval between background usage statistics flushes
pub const DEFAULT_FLUSH_INTERVAL_SECS: u64 = 5;

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the configured log filter
pub const LOG_ENV_VAR: &str = "CTFAI_LOG";

/// File stem used for rolling log files when the path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "ctfai";

// ============================================================================
// HEALTH CONSTANTS
// ============================================================================

/// Key read to check the state store
pub const HEALTH_CHECK_KEY: &str = "health_check";
