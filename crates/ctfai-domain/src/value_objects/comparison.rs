//! Comparison report value objects

use super::generation::{GenerationResult, TaskParams};

/// Outcome of fanning one task out to several providers
///
/// `entries` holds exactly one result per distinct requested provider, in
/// the order the providers were requested.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    /// The task that was compared
    pub params: TaskParams,
    /// One result per requested provider
    pub entries: Vec<GenerationResult>,
    /// Wall-clock time from dispatch until the last member finished
    pub total_duration_ms: u64,
}

impl ComparisonReport {
    /// Number of providers attempted
    pub fn models_compared(&self) -> usize {
        self.entries.len()
    }

    /// Entry for the named provider
    pub fn entry(&self, provider: &str) -> Option<&GenerationResult> {
        self.entries.iter().find(|e| e.provider == provider)
    }

    /// Number of successful entries
    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_success()).count()
    }
}
