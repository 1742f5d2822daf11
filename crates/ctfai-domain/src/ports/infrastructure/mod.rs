//! Infrastructure service ports

/// Provider lookup used by the statistics aggregator
pub mod directory;
/// Key-value persistence
pub mod state_store;

pub use directory::ProviderDirectory;
pub use state_store::StateStoreProvider;
