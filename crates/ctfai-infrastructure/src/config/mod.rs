//! Configuration management
//!
//! Layered application configuration: built-in defaults, then a TOML file,
//! then `CTFAI_*` environment variables.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::*;
