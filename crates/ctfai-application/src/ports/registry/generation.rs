//! Generation Adapter Registry
//!
//! Auto-registration system for AI generation adapters using linkme
//! distributed slices. Adapters register themselves via
//! `#[linkme::distributed_slice]` and are discovered at runtime by their
//! kind name.

use std::sync::Arc;

use ctfai_domain::ports::GenerationProvider;
use ctfai_domain::value_objects::ProviderConfig;

/// Registry entry for generation adapters
///
/// Each adapter implementation registers itself with this entry using
/// `#[linkme::distributed_slice(GENERATION_PROVIDERS)]`. The factory
/// receives the stored provider config and rejects it (with a message) when
/// required fields are missing or the endpoint is not a valid URL.
pub struct GenerationProviderEntry {
    /// Adapter kind (e.g., "openai", "gemini", "ollama", "echo")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create an adapter instance
    pub factory: fn(&ProviderConfig) -> Result<Arc<dyn GenerationProvider>, String>,
}

// Auto-collection via linkme distributed slices - adapters submit entries at compile time
#[linkme::distributed_slice]
pub static GENERATION_PROVIDERS: [GenerationProviderEntry] = [..];

/// Build the adapter for a provider config
///
/// # Returns
/// * `Ok(Arc<dyn GenerationProvider>)` - Created adapter instance
/// * `Err(String)` - Unknown kind, or the factory rejected the config
///
/// # Example
///
/// ```ignore
/// let config = ProviderConfig::new("local", "ollama")
///     .with_endpoint("http://localhost:11434")
///     .with_model("llama3");
/// let adapter = resolve_generation_provider(&config)?;
/// ```
pub fn resolve_generation_provider(
    config: &ProviderConfig,
) -> Result<Arc<dyn GenerationProvider>, String> {
    let kind = config.kind.trim();

    if let Some(entry) = GENERATION_PROVIDERS.iter().find(|e| e.name == kind) {
        return (entry.factory)(config);
    }

    let available: Vec<&str> = GENERATION_PROVIDERS.iter().map(|e| e.name).collect();

    Err(format!(
        "Unknown adapter kind '{kind}'. Available kinds: {available:?}"
    ))
}

/// List all registered adapter kinds as (name, description) tuples
pub fn list_generation_providers() -> Vec<(&'static str, &'static str)> {
    GENERATION_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
