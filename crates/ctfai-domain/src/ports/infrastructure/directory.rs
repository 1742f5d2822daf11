//! Provider Directory Port

/// Answers whether a provider name is currently registered
pub trait ProviderDirectory: Send + Sync {
    /// Whether `name` is a registered provider
    fn contains(&self, name: &str) -> bool;
}
