//! Admin API (`/ai-admin`)
//!
//! Provider configuration management, connectivity tests and usage
//! statistics. Every route resolves the caller through [`auth::AdminPrincipal`].

pub mod auth;
pub mod handlers;
pub mod models;

pub use auth::{AdminAuthConfig, AdminPrincipal};
pub use handlers::routes;
