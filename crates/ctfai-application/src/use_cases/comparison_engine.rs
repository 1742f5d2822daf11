//! Comparison Engine
//!
//! Fans one task out to several providers at once and joins every member
//! call before building the report. Members run on their own router tasks
//! with independent deadlines, so a hung provider only delays the report by
//! its own deadline. A member failure becomes that member's entry and never
//! aborts its siblings.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::info;

use ctfai_domain::error::{Error, Result};
use ctfai_domain::value_objects::{
    ComparisonReport, GenerationFailure, GenerationResult, TaskParams,
};

use super::generation_router::GenerationRouter;
use crate::ports::ComparisonServiceInterface;
use crate::utils::TimedOperation;

/// Multi-provider comparison service
pub struct ComparisonEngine {
    router: Arc<GenerationRouter>,
}

impl ComparisonEngine {
    /// Create an engine dispatching through `router`
    pub fn new(router: Arc<GenerationRouter>) -> Self {
        Self { router }
    }

    /// Compare with an externally owned cancellation token
    ///
    /// Cancelling `cancel` abandons every member still in flight; those
    /// members still record their statistics.
    pub async fn compare_with_cancel(
        &self,
        params: TaskParams,
        providers: Vec<String>,
        timeout_ms: Option<u64>,
        cancel: CancellationToken,
    ) -> Result<ComparisonReport> {
        let names = distinct_names(providers)?;
        if timeout_ms == Some(0) {
            return Err(Error::invalid_request("timeout_ms must be greater than 0"));
        }
        let task = params.validate()?;
        let kind = task.kind();

        let timer = TimedOperation::start();
        let members = names.iter().map(|name| {
            let task = task.clone();
            let cancel = cancel.child_token();
            async move {
                match self.router.registry().resolve(Some(name)) {
                    Ok(provider) => {
                        self.router
                            .dispatch(provider, task, timeout_ms, cancel)
                            .await
                    }
                    Err(e) => {
                        GenerationResult::failure(name.as_str(), kind, 0, GenerationFailure::from(&e))
                    }
                }
            }
        });
        let entries = join_all(members).await;
        let total_duration_ms = timer.elapsed_ms();

        let report = ComparisonReport {
            params,
            entries,
            total_duration_ms,
        };
        info!(
            task = %kind,
            models_compared = report.models_compared(),
            succeeded = report.success_count(),
            total_duration_ms,
            "Comparison finished"
        );
        Ok(report)
    }
}

#[async_trait]
impl ComparisonServiceInterface for ComparisonEngine {
    async fn compare(
        &self,
        params: TaskParams,
        providers: Vec<String>,
        timeout_ms: Option<u64>,
    ) -> Result<ComparisonReport> {
        let cancel = CancellationToken::new();
        let _abandon_on_drop = cancel.clone().drop_guard();
        self.compare_with_cancel(params, providers, timeout_ms, cancel)
            .await
    }
}

/// Trimmed provider names in request order, first occurrence wins
fn distinct_names(providers: Vec<String>) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(providers.len());
    for name in providers {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_request("provider names cannot be empty"));
        }
        if seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    }
    if names.is_empty() {
        return Err(Error::invalid_request(
            "at least one provider is required for a comparison",
        ));
    }
    Ok(names)
}
