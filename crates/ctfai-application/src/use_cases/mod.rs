//! Use case implementations
//!
//! - **provider_registry** - Provider configs, adapters and default selection
//! - **generation_router** - Single-provider generation
//! - **comparison_engine** - Concurrent multi-provider comparison
//! - **usage_stats** - Per-provider call counters
//! - **admin_service** - Authorization-guarded admin operations

pub mod admin_service;
pub mod comparison_engine;
pub mod deadline;
pub mod generation_router;
pub mod provider_registry;
pub mod usage_stats;

pub use admin_service::{AdminConfigService, Principal};
pub use comparison_engine::ComparisonEngine;
pub use deadline::DeadlinePolicy;
pub use generation_router::GenerationRouter;
pub use provider_registry::{ProviderRegistry, RegisteredProvider, StoredProvider};
pub use usage_stats::UsageStatsAggregator;
