//! Domain layer constants
//!
//! Limits and defaults that belong to the business rules. Infrastructure
//! specific constants live in `ctfai_infrastructure::constants`.

// ============================================================================
// PROVIDER CONSTANTS
// ============================================================================

/// Maximum length of a provider name
pub const PROVIDER_NAME_MAX_LEN: usize = 64;

/// Default `max_tokens` stored on a new provider config
pub const DEFAULT_PROVIDER_MAX_TOKENS: u32 = 2000;

/// Default temperature stored on a new provider config
pub const DEFAULT_PROVIDER_TEMPERATURE: f32 = 0.7;

/// Statistics bucket for calls whose provider is not (or no longer) registered
pub const UNKNOWN_PROVIDER_BUCKET: &str = "unknown";

// ============================================================================
// GENERATION CONSTANTS
// ============================================================================

/// Deadline applied when neither the call nor the provider sets one
pub const DEFAULT_GENERATION_TIMEOUT_MS: u64 = 30_000;

/// Upper bound for any resolved deadline
pub const MAX_GENERATION_TIMEOUT_MS: u64 = 120_000;

/// Smallest accepted `max_tokens`
pub const MIN_MAX_TOKENS: u32 = 1;

/// Largest accepted `max_tokens`
pub const MAX_MAX_TOKENS: u32 = 32_768;

/// Lowest accepted sampling temperature
pub const MIN_TEMPERATURE: f32 = 0.0;

/// Highest accepted sampling temperature
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Default `max_tokens` for free text generation
pub const DEFAULT_TEXT_MAX_TOKENS: u32 = 1000;

/// Default temperature for free text generation
pub const DEFAULT_TEXT_TEMPERATURE: f32 = 0.7;

/// Token budget for flag generation
pub const FLAG_MAX_TOKENS: u32 = 100;

/// Temperature for flag generation
pub const FLAG_TEMPERATURE: f32 = 0.8;

/// Prefix every normalized flag starts with
pub const FLAG_PREFIX: &str = "flag{";

// ============================================================================
// USAGE STATISTICS CONSTANTS
// ============================================================================

/// Days covered by a usage report when the caller does not choose
pub const DEFAULT_USAGE_WINDOW_DAYS: u32 = 7;

/// Longest usage report window; daily buckets older than this are pruned
pub const MAX_USAGE_WINDOW_DAYS: u32 = 90;

/// Calls kept in the recent call log
pub const CALL_LOG_CAPACITY: usize = 200;

/// Calls returned by a call log read when the caller does not choose
pub const DEFAULT_CALL_LOG_LIMIT: usize = 50;

// ============================================================================
// PERSISTENCE KEYS
// ============================================================================

/// State store key holding the provider registry snapshot
pub const REGISTRY_STATE_KEY: &str = "provider_registry";

/// State store key holding the usage statistics snapshot
pub const USAGE_STATE_KEY: &str = "usage_stats";
