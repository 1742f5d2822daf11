//! # CTF AI Orchestration Server
//!
//! HTTP API of the AI provider orchestration service.
//!
//! | Prefix | Module | Description |
//! |--------|--------|-------------|
//! | `/ai-multi` | [`multi`] | Challenge, flag and text generation; provider comparison |
//! | `/ai-admin` | [`admin`] | Provider configuration, connectivity tests, usage statistics |
//! | `/health` | [`routes`] | Health checks |
//!
//! Errors are returned as `{error, message}` with the status chosen by
//! [`error::status_for`].

pub mod admin;
pub mod args;
pub mod error;
pub mod init;
pub mod multi;
pub mod routes;

pub use args::Cli;
pub use init::run_server;
pub use routes::build_rocket;
