//! # CTF AI Orchestration - Domain Layer
//!
//! Core types shared by every other crate of the service:
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`error`] | Error taxonomy and the user-visible [`ErrorKind`] |
//! | [`value_objects`] | Provider configs, generation requests/results, comparison reports, usage stats |
//! | [`ports`] | Contracts implemented by adapters and stores |
//! | [`constants`] | Limits and defaults that are part of the domain rules |
//!
//! The domain layer performs no I/O.

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, ErrorKind, Result};
