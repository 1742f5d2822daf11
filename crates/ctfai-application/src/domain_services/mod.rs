//! Domain services
//!
//! Pure functions shared by the router and the comparison engine: prompt
//! construction for each task kind and normalization of raw adapter output.

/// Adapter output normalization
pub mod normalization;
/// Prompt construction
pub mod prompts;

pub use normalization::{normalize_challenge, normalize_completion, normalize_flag};
pub use prompts::build_completion_request;
