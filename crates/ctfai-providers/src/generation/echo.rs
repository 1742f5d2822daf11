//! Echo Generation Adapter
//!
//! Offline adapter that answers from the prompt itself. Used for local
//! development and tests. Behaviour is driven by provider options:
//!
//! | Option | Values | Effect |
//! |--------|--------|--------|
//! | `delay_ms` | integer | Wait before answering |
//! | `mode` | `echo` (default), `fail`, `malformed`, `hang` | Answer, error, return unusable output, never answer |

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use ctfai_application::ports::registry::{GENERATION_PROVIDERS, GenerationProviderEntry};
use ctfai_domain::error::{Error, Result};
use ctfai_domain::ports::{CompletionRequest, GenerationProvider, RawCompletion};
use ctfai_domain::value_objects::{ProviderConfig, TaskKind};

use crate::constants::{ECHO_FLAG, ECHO_MODEL};

/// How the echo adapter answers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EchoMode {
    /// Answer with a well-formed payload built from the prompt
    #[default]
    Echo,
    /// Fail with a provider error
    Fail,
    /// Return output no task can be normalized from
    Malformed,
    /// Never answer
    Hang,
}

impl FromStr for EchoMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "echo" => Ok(Self::Echo),
            "fail" => Ok(Self::Fail),
            "malformed" => Ok(Self::Malformed),
            "hang" => Ok(Self::Hang),
            other => Err(format!(
                "unknown echo mode '{other}' (expected echo, fail, malformed or hang)"
            )),
        }
    }
}

/// Deterministic offline adapter
#[derive(Debug, Clone, Default)]
pub struct EchoGenerationProvider {
    delay: Duration,
    mode: EchoMode,
}

impl EchoGenerationProvider {
    /// Create an adapter answering after `delay`
    pub fn new(delay: Duration, mode: EchoMode) -> Self {
        Self { delay, mode }
    }

    /// Build the adapter from the `delay_ms` and `mode` options
    pub fn from_config(config: &ProviderConfig) -> std::result::Result<Self, String> {
        let delay_ms = match config.options.get("delay_ms") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("invalid echo delay_ms '{value}': {e}"))?,
            None => 0,
        };
        let mode = match config.options.get("mode") {
            Some(value) => value.parse()?,
            None => EchoMode::default(),
        };
        Ok(Self::new(Duration::from_millis(delay_ms), mode))
    }

    /// Configured answer mode
    pub fn mode(&self) -> EchoMode {
        self.mode
    }

    async fn wait(&self) {
        if self.mode == EchoMode::Hang {
            std::future::pending::<()>().await;
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn answer(request: &CompletionRequest) -> String {
        match request.task {
            TaskKind::Challenge => serde_json::json!({
                "title": "Echo challenge",
                "description": request.prompt,
                "flag": ECHO_FLAG,
                "hints": [],
            })
            .to_string(),
            TaskKind::Flag => ECHO_FLAG.to_string(),
            TaskKind::Text => request.prompt.clone(),
        }
    }
}

#[async_trait]
impl GenerationProvider for EchoGenerationProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<RawCompletion> {
        self.wait().await;
        match self.mode {
            EchoMode::Fail => Err(Error::provider("echo adapter configured to fail")),
            EchoMode::Malformed => Ok(RawCompletion::text("")),
            EchoMode::Echo | EchoMode::Hang => Ok(RawCompletion::text(Self::answer(request))),
        }
    }

    async fn ping(&self, _deadline: Duration) -> Result<()> {
        self.wait().await;
        match self.mode {
            EchoMode::Fail => Err(Error::provider("echo adapter configured to fail")),
            _ => Ok(()),
        }
    }

    fn provider_kind(&self) -> &str {
        "echo"
    }

    fn model(&self) -> &str {
        ECHO_MODEL
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

fn echo_factory(config: &ProviderConfig) -> std::result::Result<Arc<dyn GenerationProvider>, String> {
    Ok(Arc::new(EchoGenerationProvider::from_config(config)?))
}

#[linkme::distributed_slice(GENERATION_PROVIDERS)]
static ECHO_PROVIDER: GenerationProviderEntry = GenerationProviderEntry {
    name: "echo",
    description: "Offline echo adapter for development and tests",
    factory: echo_factory,
};
