//! Shared utilities for the application layer

/// Timing instrumentation helpers
pub mod timing;

pub use timing::TimedOperation;
