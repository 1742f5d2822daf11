//! Application Layer - CTF AI orchestration
//!
//! Use cases of the service: the provider registry, single-provider
//! generation routing, concurrent comparison across providers, usage
//! statistics and the admin operations built on top of them.
//!
//! ## Architecture
//!
//! The application layer:
//! - Implements the use cases over the ports declared in `ctfai-domain`
//! - Declares the adapter registry slice that `ctfai-providers` fills
//! - Has no dependencies on infrastructure or HTTP frameworks
//!
//! ## Concurrency
//!
//! Registry reads are lock-free snapshots. Every adapter invocation runs on
//! its own task under a deadline, so a slow provider never blocks another
//! request or another comparison member.

pub mod domain_services;
pub mod ports;
pub mod use_cases;
pub mod utils;

pub use domain_services::*;
pub use ports::*;
pub use use_cases::*;
