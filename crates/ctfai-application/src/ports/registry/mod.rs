//! Adapter Registry System
//!
//! Auto-registration infrastructure for generation adapters. Uses the
//! `linkme` crate for compile-time registration of adapters that are
//! discovered and instantiated at runtime.
//!
//! ```text
//! 1. Adapter defines:  #[linkme::distributed_slice(GENERATION_PROVIDERS)]
//!                      static ENTRY: GenerationProviderEntry = ...
//! 2. Registry declares the slice:  GENERATION_PROVIDERS: [Entry] = [..]
//! 3. Resolver queries:  GENERATION_PROVIDERS.iter()
//! 4. Provider config selects:  kind = "ollama" -> OllamaGenerationProvider
//! ```

pub mod generation;

pub use generation::{
    GENERATION_PROVIDERS, GenerationProviderEntry, list_generation_providers,
    resolve_generation_provider,
};
