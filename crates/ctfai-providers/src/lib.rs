//! # CTF AI - Provider Implementations
//!
//! User-selectable implementations of the ports defined in `ctfai-domain`.
//!
//! ## Provider Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Generation | `GenerationProvider` | OpenAI-compatible, Gemini, Ollama, Echo |
//! | State Store | `StateStoreProvider` | Filesystem, InMemory |
//!
//! Generation adapters register themselves in the application layer's
//! `GENERATION_PROVIDERS` slice, so linking this crate is enough to make
//! their kinds available to the provider registry:
//!
//! ```ignore
//! extern crate ctfai_providers;
//! ```

pub use ctfai_domain::error::{Error, Result};
pub use ctfai_domain::ports::{GenerationProvider, StateStoreProvider};

/// Provider-specific constants
pub mod constants;

/// Shared utilities for provider implementations
pub mod utils;

/// Generation adapter implementations
///
/// Implements `GenerationProvider` for the supported AI backends.
pub mod generation;

/// State store implementations
///
/// Implements `StateStoreProvider` for persistence backends.
pub mod state_store;

pub use generation::{
    EchoGenerationProvider, EchoMode, GeminiGenerationProvider, OllamaGenerationProvider,
    OpenAIGenerationProvider,
};
pub use state_store::{FilesystemStateStore, InMemoryStateStore};
