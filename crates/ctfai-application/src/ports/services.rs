//! Application service interfaces
//!
//! Contracts the HTTP layer depends on. Concrete implementations live in
//! `use_cases`; tests substitute their own.

use async_trait::async_trait;

use ctfai_domain::error::Result;
use ctfai_domain::value_objects::{
    CallLogEntry, ComparisonReport, DailyUsage, DateRange, GenerationRequest, GenerationResult,
    TaskParams, UsageSnapshot,
};

/// Single-provider generation
#[async_trait]
pub trait GenerationServiceInterface: Send + Sync {
    /// Resolve, validate, invoke and normalize one call
    ///
    /// Resolution and validation problems are returned as errors; provider
    /// failures come back as a failed [`GenerationResult`].
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult>;
}

/// Multi-provider comparison
#[async_trait]
pub trait ComparisonServiceInterface: Send + Sync {
    /// Fan the task out to every named provider and join all results
    async fn compare(
        &self,
        params: TaskParams,
        providers: Vec<String>,
        timeout_ms: Option<u64>,
    ) -> Result<ComparisonReport>;
}

/// Process-wide usage counters
pub trait UsageStatsInterface: Send + Sync {
    /// Record one completed call; never fails
    fn record(&self, provider: &str, success: bool, duration_ms: u64, tokens: Option<u64>);

    /// Append a completed call to the recent call log
    fn log_call(&self, entry: CallLogEntry);

    /// Point-in-time view of all counters
    fn snapshot(&self) -> UsageSnapshot;

    /// Per-day counters inside `range`
    fn daily(&self, range: &DateRange) -> Vec<DailyUsage>;

    /// Up to `limit` most recent calls, newest first
    fn recent_calls(&self, limit: usize) -> Vec<CallLogEntry>;
}
