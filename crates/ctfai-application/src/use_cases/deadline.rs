//! Deadline resolution for provider calls

use std::time::Duration;

use ctfai_domain::constants::{DEFAULT_GENERATION_TIMEOUT_MS, MAX_GENERATION_TIMEOUT_MS};

/// How long a single provider call may take
///
/// The per-call value wins over the provider's configured value, which wins
/// over `default_timeout_ms`; the result never exceeds `max_timeout_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlinePolicy {
    /// Deadline when neither the call nor the provider sets one
    pub default_timeout_ms: u64,
    /// Upper bound for any deadline
    pub max_timeout_ms: u64,
}

impl DeadlinePolicy {
    /// Create a policy
    pub fn new(default_timeout_ms: u64, max_timeout_ms: u64) -> Self {
        Self {
            default_timeout_ms,
            max_timeout_ms,
        }
    }

    /// Resolve the deadline in milliseconds
    pub fn resolve_ms(&self, call_timeout_ms: Option<u64>, provider_timeout_ms: Option<u64>) -> u64 {
        call_timeout_ms
            .or(provider_timeout_ms)
            .unwrap_or(self.default_timeout_ms)
            .min(self.max_timeout_ms)
    }

    /// Resolve the deadline as a Duration
    pub fn resolve(&self, call_timeout_ms: Option<u64>, provider_timeout_ms: Option<u64>) -> Duration {
        Duration::from_millis(self.resolve_ms(call_timeout_ms, provider_timeout_ms))
    }
}

impl Default for DeadlinePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_GENERATION_TIMEOUT_MS, MAX_GENERATION_TIMEOUT_MS)
    }
}
