//! Domain Port Interfaces
//!
//! Contracts implemented outside the domain:
//! - **providers/** - AI generation adapters
//! - **infrastructure/** - persistence and provider lookup

/// Infrastructure service ports
pub mod infrastructure;
/// External service provider ports
pub mod providers;

pub use infrastructure::{ProviderDirectory, StateStoreProvider};
pub use providers::{CompletionRequest, GenerationProvider, RawCompletion};
