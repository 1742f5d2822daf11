//! Admin Config Service
//!
//! Administrative operations over the provider registry and usage
//! statistics. Every operation takes the caller's [`Principal`] and fails
//! with `Forbidden` for non-admin callers before touching any state.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use ctfai_domain::constants::{CALL_LOG_CAPACITY, DEFAULT_CALL_LOG_LIMIT, DEFAULT_USAGE_WINDOW_DAYS};
use ctfai_domain::error::{Error, Result};
use ctfai_domain::value_objects::{
    CallLogEntry, ConnectivityReport, DateRange, ProviderConfig, ProviderPatch, ProviderView,
    UsageReport, UsageSnapshot,
};

use super::provider_registry::{ProviderRegistry, StoredProvider};
use crate::ports::UsageStatsInterface;

/// Identity of the caller of an admin operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    admin: bool,
}

impl Principal {
    /// A caller holding admin privileges
    pub fn admin() -> Self {
        Self { admin: true }
    }

    /// A caller without admin privileges
    pub fn anonymous() -> Self {
        Self { admin: false }
    }

    /// Whether the caller holds admin privileges
    pub fn is_admin(&self) -> bool {
        self.admin
    }
}

/// Admin operations guarded by [`Principal`]
pub struct AdminConfigService {
    registry: Arc<ProviderRegistry>,
    stats: Arc<dyn UsageStatsInterface>,
}

impl AdminConfigService {
    /// Create the service
    pub fn new(registry: Arc<ProviderRegistry>, stats: Arc<dyn UsageStatsInterface>) -> Self {
        Self { registry, stats }
    }

    fn authorize(&self, principal: Principal, operation: &str) -> Result<()> {
        if principal.is_admin() {
            return Ok(());
        }
        warn!(operation, "Admin operation rejected for non-admin caller");
        Err(Error::forbidden(format!(
            "admin privileges are required to {operation}"
        )))
    }

    fn view(&self, config: &ProviderConfig) -> ProviderView {
        let is_default = self.registry.default_provider().as_deref() == Some(config.name.as_str());
        ProviderView::from_config(config, is_default)
    }

    fn stored_view(stored: &StoredProvider, default: Option<&str>) -> ProviderView {
        let view = ProviderView::from_config(&stored.config, default == Some(stored.config.name.as_str()));
        match &stored.unavailable_reason {
            Some(reason) => view.with_unavailable_reason(reason.as_str()),
            None => view,
        }
    }

    /// Provider views ordered by name, optionally only the enabled ones
    ///
    /// Parked providers are listed with their `unavailable_reason`.
    pub fn list_providers(&self, principal: Principal, enabled_only: bool) -> Result<Vec<ProviderView>> {
        self.authorize(principal, "list providers")?;
        let default = self.registry.default_provider();
        Ok(self
            .registry
            .stored()
            .iter()
            .filter(|p| !enabled_only || p.config.enabled)
            .map(|p| Self::stored_view(p, default.as_deref()))
            .collect())
    }

    /// View of one provider
    pub fn get_provider(&self, principal: Principal, name: &str) -> Result<ProviderView> {
        self.authorize(principal, "read provider configuration")?;
        let stored = self.registry.stored_one(name)?;
        let default = self.registry.default_provider();
        Ok(Self::stored_view(&stored, default.as_deref()))
    }

    /// Create a provider
    pub async fn create_provider(
        &self,
        principal: Principal,
        config: ProviderConfig,
    ) -> Result<ProviderView> {
        self.authorize(principal, "create providers")?;
        let stored = self.registry.create(config).await?;
        Ok(self.view(&stored))
    }

    /// Apply a partial update to an existing provider
    pub async fn update_provider(
        &self,
        principal: Principal,
        name: &str,
        patch: ProviderPatch,
    ) -> Result<ProviderView> {
        self.authorize(principal, "update providers")?;
        let stored = self.registry.patch(name, patch).await?;
        Ok(self.view(&stored))
    }

    /// Delete a provider
    pub async fn delete_provider(&self, principal: Principal, name: &str) -> Result<()> {
        self.authorize(principal, "delete providers")?;
        self.registry.remove(name).await
    }

    /// Make a provider the configured default
    pub async fn set_default_provider(&self, principal: Principal, name: &str) -> Result<()> {
        self.authorize(principal, "change the default provider")?;
        self.registry.set_default(name).await
    }

    /// Create the well-known provider catalogue; returns the names created
    pub async fn seed_defaults(&self, principal: Principal) -> Result<Vec<String>> {
        self.authorize(principal, "seed default providers")?;
        self.registry.seed_defaults().await
    }

    /// Run a connectivity test against one provider
    pub async fn test_connectivity(
        &self,
        principal: Principal,
        name: &str,
    ) -> Result<ConnectivityReport> {
        self.authorize(principal, "test providers")?;
        self.registry.test_connectivity(name).await
    }

    /// Usage statistics, optionally restricted to one provider bucket
    ///
    /// Daily rows cover the `days` long window ending today (UTC), 7 days by
    /// default and at most 90. A filter naming a bucket with no recorded
    /// calls yields an empty report rather than an error.
    pub fn usage_stats(
        &self,
        principal: Principal,
        provider: Option<&str>,
        days: Option<u32>,
    ) -> Result<UsageReport> {
        self.authorize(principal, "read usage statistics")?;
        let range = DateRange::ending_on(
            Utc::now().date_naive(),
            days.unwrap_or(DEFAULT_USAGE_WINDOW_DAYS),
        )?;
        let filter = provider_filter(provider);

        let snapshot = self.stats.snapshot();
        let providers: BTreeMap<_, _> = snapshot
            .providers
            .into_iter()
            .filter(|(name, _)| filter.is_none_or(|f| name == f))
            .collect();
        let daily = self
            .stats
            .daily(&range)
            .into_iter()
            .filter(|row| filter.is_none_or(|f| row.provider == f))
            .collect();

        Ok(UsageReport::new(UsageSnapshot { providers }, daily, range))
    }

    /// Most recent calls, newest first, optionally for one provider
    ///
    /// `limit` defaults to 50 and is capped at the log capacity; zero is
    /// `InvalidRequest`.
    pub fn call_log(
        &self,
        principal: Principal,
        provider: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<CallLogEntry>> {
        self.authorize(principal, "read the call log")?;
        let limit = limit.unwrap_or(DEFAULT_CALL_LOG_LIMIT);
        if limit == 0 {
            return Err(Error::invalid_request("limit must be at least 1"));
        }
        let limit = limit.min(CALL_LOG_CAPACITY);

        Ok(match provider_filter(provider) {
            None => self.stats.recent_calls(limit),
            Some(filter) => self
                .stats
                .recent_calls(CALL_LOG_CAPACITY)
                .into_iter()
                .filter(|call| call.provider == filter)
                .take(limit)
                .collect(),
        })
    }
}

fn provider_filter(provider: Option<&str>) -> Option<&str> {
    provider.map(str::trim).filter(|p| !p.is_empty())
}
