//! External service provider ports

/// AI generation adapter port
pub mod generation;

pub use generation::{CompletionRequest, GenerationProvider, RawCompletion};
