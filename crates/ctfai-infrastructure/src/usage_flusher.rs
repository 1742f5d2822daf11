//! Background persistence of usage statistics

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use ctfai_application::use_cases::UsageStatsAggregator;
use ctfai_domain::error::Result;
use ctfai_domain::ports::StateStoreProvider;

/// Periodically writes changed usage counters to the state store
pub struct UsageFlusher {
    stats: Arc<UsageStatsAggregator>,
    store: Arc<dyn StateStoreProvider>,
    interval: Duration,
}

impl UsageFlusher {
    /// Create a flusher; `interval` must be non-zero
    pub fn new(
        stats: Arc<UsageStatsAggregator>,
        store: Arc<dyn StateStoreProvider>,
        interval: Duration,
    ) -> Self {
        Self {
            stats,
            store,
            interval,
        }
    }

    /// Persist the counters when they changed; returns whether a write happened
    pub async fn flush_if_dirty(
        stats: &UsageStatsAggregator,
        store: &dyn StateStoreProvider,
    ) -> Result<bool> {
        if !stats.is_dirty() {
            return Ok(false);
        }
        stats.persist(store).await?;
        Ok(true)
    }

    /// Run until `shutdown` is cancelled, then flush one last time
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    () = shutdown.cancelled() => break,
                    _ = ticker.tick() => self.flush("interval").await,
                }
            }

            self.flush("shutdown").await;
            info!("Usage statistics flusher stopped");
        })
    }

    async fn flush(&self, trigger: &str) {
        match Self::flush_if_dirty(&self.stats, self.store.as_ref()).await {
            Ok(true) => debug!(trigger, "Usage statistics flushed"),
            Ok(false) => {}
            Err(e) => warn!(trigger, error = %e, "Failed to flush usage statistics"),
        }
    }
}
