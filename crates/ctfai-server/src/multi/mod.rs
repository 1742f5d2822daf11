//! Generation API (`/ai-multi`)
//!
//! Single-provider generation of challenges, flags and free text, plus the
//! multi-provider comparison endpoint.

pub mod handlers;
pub mod models;

pub use handlers::routes;
