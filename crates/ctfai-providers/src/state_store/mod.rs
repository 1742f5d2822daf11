//! State Store Implementations
//!
//! Key-value persistence for the provider registry and usage statistics.
//!
//! | Store | Durability |
//! |-------|------------|
//! | FilesystemStateStore | One JSON file per key, atomic replace |
//! | InMemoryStateStore | Process lifetime only |

pub mod filesystem;
pub mod memory;

pub use filesystem::FilesystemStateStore;
pub use memory::InMemoryStateStore;
