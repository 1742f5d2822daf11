//! Generation Router
//!
//! Resolves a request to one provider, validates it, invokes the adapter
//! under a deadline and normalizes the output.
//!
//! Every adapter invocation runs on its own task. That task owns the
//! statistics update, so a call is recorded exactly once even when the
//! caller stops waiting: dropping the caller's future cancels the task's
//! token, the outbound request is abandoned, and the call is recorded as a
//! `Cancelled` failure.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use ctfai_domain::error::{Error, ErrorKind, Result};
use ctfai_domain::value_objects::{
    CallLogEntry, GenerationFailure, GenerationRequest, GenerationResult, Task,
};

use super::deadline::DeadlinePolicy;
use super::provider_registry::{ProviderRegistry, RegisteredProvider};
use crate::domain_services::{build_completion_request, normalize_completion};
use crate::ports::{GenerationServiceInterface, UsageStatsInterface};
use crate::utils::TimedOperation;

/// Single-provider generation service
pub struct GenerationRouter {
    registry: Arc<ProviderRegistry>,
    stats: Arc<dyn UsageStatsInterface>,
    deadlines: DeadlinePolicy,
}

impl GenerationRouter {
    /// Create a router over `registry` recording into `stats`
    pub fn new(
        registry: Arc<ProviderRegistry>,
        stats: Arc<dyn UsageStatsInterface>,
        deadlines: DeadlinePolicy,
    ) -> Self {
        Self {
            registry,
            stats,
            deadlines,
        }
    }

    /// Registry this router resolves against
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Generate with an externally owned cancellation token
    ///
    /// Resolution and validation errors are returned before any provider is
    /// contacted and leave statistics untouched.
    pub async fn generate_with_cancel(
        &self,
        request: GenerationRequest,
        cancel: CancellationToken,
    ) -> Result<GenerationResult> {
        request.validate_timeout()?;
        let provider = self.registry.resolve(request.explicit_provider())?;
        let task = request.params.validate()?;
        Ok(self
            .dispatch(provider, task, request.timeout_ms, cancel)
            .await)
    }

    /// Invoke an already resolved provider with an already validated task
    pub(crate) async fn dispatch(
        &self,
        provider: RegisteredProvider,
        task: Task,
        call_timeout_ms: Option<u64>,
        cancel: CancellationToken,
    ) -> GenerationResult {
        let timeout_ms = self
            .deadlines
            .resolve_ms(call_timeout_ms, provider.config.timeout_ms);
        let deadline = Duration::from_millis(timeout_ms);
        let request = build_completion_request(&task, &provider.config, deadline);
        let kind = task.kind();
        let name = provider.config.name.clone();
        let provider_name = name.clone();
        let stats = Arc::clone(&self.stats);

        let handle = tokio::spawn(async move {
            let timer = TimedOperation::start();
            let call = AssertUnwindSafe(provider.adapter.complete(&request)).catch_unwind();

            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => Err(Error::cancelled("caller stopped waiting for the provider")),
                res = tokio::time::timeout(deadline, call) => match res {
                    Err(_) => Err(Error::timeout(timeout_ms)),
                    Ok(Err(_)) => Err(Error::provider("adapter panicked")),
                    Ok(Ok(Err(e))) => Err(e),
                    Ok(Ok(Ok(raw))) => normalize_completion(kind, &raw).map(|p| (p, raw.tokens_used)),
                },
            };
            let duration_ms = timer.elapsed_ms();

            match outcome {
                Ok((payload, tokens)) => {
                    stats.record(&name, true, duration_ms, tokens);
                    stats.log_call(CallLogEntry::success(name.as_str(), kind, duration_ms));
                    info!(provider = %name, task = %kind, duration_ms, "Generation succeeded");
                    GenerationResult::success(name, kind, duration_ms, payload)
                }
                Err(e) => {
                    stats.record(&name, false, duration_ms, None);
                    warn!(
                        provider = %name,
                        task = %kind,
                        duration_ms,
                        error_kind = %e.kind(),
                        error = %e,
                        "Generation failed"
                    );
                    let failure = GenerationFailure::from(&e);
                    stats.log_call(CallLogEntry::failure(name.as_str(), kind, duration_ms, &failure));
                    GenerationResult::failure(name, kind, duration_ms, failure)
                }
            }
        });

        match handle.await {
            Ok(result) => result,
            Err(join_error) => {
                error!(error = %join_error, "Generation task aborted");
                GenerationResult::failure(
                    provider_name,
                    kind,
                    0,
                    GenerationFailure::new(ErrorKind::Internal, join_error.to_string()),
                )
            }
        }
    }
}

#[async_trait]
impl GenerationServiceInterface for GenerationRouter {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult> {
        let cancel = CancellationToken::new();
        let _abandon_on_drop = cancel.clone().drop_guard();
        self.generate_with_cancel(request, cancel).await
    }
}
