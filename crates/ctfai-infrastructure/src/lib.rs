//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns that support the application and domain layers.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Layered configuration (defaults, TOML, `CTFAI_*` environment) |
//! | [`logging`] | Structured logging with tracing |
//! | [`bootstrap`] | Composition root building the [`AppContext`] |
//! | [`usage_flusher`] | Background persistence of usage statistics |
//! | [`health`] | Health checks |
//! | [`constants`] | Infrastructure constants |
//! | [`error_ext`] | Error context helpers |

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod health;
pub mod logging;
pub mod usage_flusher;

pub use bootstrap::{AppContext, init_app, init_app_with_store};
pub use config::{AppConfig, ConfigLoader};
pub use error_ext::ErrorContext;
