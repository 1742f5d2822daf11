//! Value objects
//!
//! Immutable data carried between the registry, router, comparison engine
//! and statistics aggregator.

/// Comparison reports
pub mod comparison;
/// Generation requests and results
pub mod generation;
/// Provider configuration
pub mod provider;
/// Usage statistics
pub mod usage;

pub use comparison::ComparisonReport;
pub use generation::{
    ChallengeCategory, Difficulty, GeneratedChallenge, GenerationFailure, GenerationOutcome,
    GenerationPayload, GenerationRequest, GenerationResult, Task, TaskKind, TaskParams,
};
pub use provider::{
    ConnectivityReport, ProviderConfig, ProviderPatch, ProviderView, validate_provider_name,
};
pub use usage::{CallLogEntry, DailyUsage, DateRange, UsageReport, UsageSnapshot, UsageStat};
