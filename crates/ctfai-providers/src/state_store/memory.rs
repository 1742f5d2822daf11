//! In-memory state store
//!
//! Keeps entries in a concurrent map. Nothing survives a restart.

use async_trait::async_trait;
use dashmap::DashMap;

use ctfai_domain::error::Result;
use ctfai_domain::ports::StateStoreProvider;

/// Process-local state store
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    entries: DashMap<String, Vec<u8>>,
}

impl InMemoryStateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl StateStoreProvider for InMemoryStateStore {
    async fn save(&self, key: &str, data: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
