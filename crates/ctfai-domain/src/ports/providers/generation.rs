//! Generation Provider Port
//!
//! The single capability every AI backend adapter implements. Adapters are
//! opaque to the rest of the service: they receive a prompt and limits and
//! hand back raw text, which the router normalizes.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::TaskKind;

/// Request handed to an adapter
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Task the prompt was built for
    pub task: TaskKind,
    /// Instructions placed before the user prompt
    pub system_prompt: String,
    /// User prompt
    pub prompt: String,
    /// Token budget
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Deadline the caller enforces; adapters may pass it to their transport
    pub deadline: Duration,
}

/// Raw adapter output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCompletion {
    /// Generated text, not yet normalized
    pub text: String,
    /// Completion tokens reported by the backend
    pub tokens_used: Option<u64>,
}

impl RawCompletion {
    /// Output without token accounting
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            tokens_used: None,
        }
    }
}

/// AI generation adapter
///
/// Cancellation is best effort: the router drops the `complete` future when
/// the deadline passes or the caller goes away, which aborts the local
/// request, but the remote backend may keep working and consume quota.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Run one completion
    async fn complete(&self, request: &CompletionRequest) -> Result<RawCompletion>;

    /// Lightweight round-trip that does not consume generation quota where
    /// the backend allows it
    async fn ping(&self, deadline: Duration) -> Result<()>;

    /// Adapter kind this instance was built from
    fn provider_kind(&self) -> &str;

    /// Model used for completions
    fn model(&self) -> &str;
}
