//! Configuration types

mod app;
mod logging;
mod server;
mod system;

pub use app::AppConfig;
pub use logging::LoggingConfig;
pub use server::ServerConfig;
pub use system::{AdminConfig, GenerationConfig, StorageBackend, StorageConfig, UsageConfig};
