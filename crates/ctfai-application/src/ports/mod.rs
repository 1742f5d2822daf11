//! Application Port Interfaces
//!
//! - **registry/** - Auto-registration system for generation adapters
//! - **services.rs** - Application service interfaces (generation, comparison, usage stats)

/// Adapter registry for dynamic adapter discovery
pub mod registry;
/// Application service interfaces
pub mod services;

pub use registry::{
    GENERATION_PROVIDERS, GenerationProviderEntry, list_generation_providers,
    resolve_generation_provider,
};
pub use services::{ComparisonServiceInterface, GenerationServiceInterface, UsageStatsInterface};
