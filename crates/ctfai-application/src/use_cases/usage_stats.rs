//! Usage Statistics Aggregator
//!
//! Lock-free per-provider counters. Each provider owns a set of atomics in a
//! sharded map, so `record` only takes a shard lock the first time a
//! provider is seen and `snapshot` never blocks writers for long.
//!
//! Next to the cumulative counters the aggregator keeps one counter set per
//! provider and UTC day, pruned after [`MAX_USAGE_WINDOW_DAYS`], and a
//! bounded log of the most recent calls.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Days, NaiveDate, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use ctfai_domain::constants::{
    CALL_LOG_CAPACITY, MAX_USAGE_WINDOW_DAYS, UNKNOWN_PROVIDER_BUCKET, USAGE_STATE_KEY,
};
use ctfai_domain::error::Result;
use ctfai_domain::ports::{ProviderDirectory, StateStoreProvider};
use ctfai_domain::value_objects::{CallLogEntry, DailyUsage, DateRange, UsageSnapshot, UsageStat};

use crate::ports::UsageStatsInterface;

#[derive(Debug, Default)]
struct ProviderCounters {
    total_calls: AtomicU64,
    successful_calls: AtomicU64,
    total_duration_ms: AtomicU64,
    total_tokens: AtomicU64,
}

impl ProviderCounters {
    fn add(&self, total: u64, successful: u64, duration_ms: u64, tokens: u64) {
        self.total_calls.fetch_add(total, Ordering::Relaxed);
        self.successful_calls.fetch_add(successful, Ordering::Relaxed);
        self.total_duration_ms
            .fetch_add(duration_ms, Ordering::Relaxed);
        self.total_tokens.fetch_add(tokens, Ordering::Relaxed);
    }

    fn add_stat(&self, stat: &UsageStat) {
        self.add(
            stat.total_calls,
            stat.successful_calls,
            stat.total_duration_ms,
            stat.total_tokens,
        );
    }

    fn stat(&self) -> UsageStat {
        UsageStat::from_counters(
            self.total_calls.load(Ordering::Relaxed),
            self.successful_calls.load(Ordering::Relaxed),
            self.total_duration_ms.load(Ordering::Relaxed),
            self.total_tokens.load(Ordering::Relaxed),
        )
    }
}

type DayKey = (NaiveDate, String);

/// Persisted form of the aggregator
///
/// Older snapshots only carry `providers`; the other sections default to
/// empty.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedUsage {
    providers: BTreeMap<String, UsageStat>,
    #[serde(default)]
    daily: Vec<DailyUsage>,
    #[serde(default)]
    recent_calls: Vec<CallLogEntry>,
}

/// Per-provider usage counters
///
/// Instances are injected into the router and the comparison engine; there
/// is no global instance.
pub struct UsageStatsAggregator {
    counters: DashMap<String, ProviderCounters>,
    daily: DashMap<DayKey, ProviderCounters>,
    calls: Mutex<VecDeque<CallLogEntry>>,
    directory: Option<Arc<dyn ProviderDirectory>>,
    dirty: AtomicBool,
}

impl UsageStatsAggregator {
    /// Aggregator that accepts every non-empty provider name
    pub fn new() -> Self {
        Self {
            counters: DashMap::new(),
            daily: DashMap::new(),
            calls: Mutex::new(VecDeque::with_capacity(CALL_LOG_CAPACITY)),
            directory: None,
            dirty: AtomicBool::new(false),
        }
    }

    /// Aggregator that buckets names unknown to `directory` under `unknown`
    pub fn with_directory(directory: Arc<dyn ProviderDirectory>) -> Self {
        Self {
            directory: Some(directory),
            ..Self::new()
        }
    }

    fn bucket<'a>(&self, provider: &'a str) -> &'a str {
        let provider = provider.trim();
        let known = !provider.is_empty()
            && self
                .directory
                .as_ref()
                .is_none_or(|directory| directory.contains(provider));
        if known {
            provider
        } else {
            UNKNOWN_PROVIDER_BUCKET
        }
    }

    fn calls(&self) -> MutexGuard<'_, VecDeque<CallLogEntry>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one call as completed on `date`
    pub fn record_on(
        &self,
        date: NaiveDate,
        provider: &str,
        success: bool,
        duration_ms: u64,
        tokens: Option<u64>,
    ) {
        let bucket = self.bucket(provider);
        let (successful, tokens) = (u64::from(success), tokens.unwrap_or(0));

        if let Some(counters) = self.counters.get(bucket) {
            counters.add(1, successful, duration_ms, tokens);
        } else {
            self.counters
                .entry(bucket.to_string())
                .or_default()
                .add(1, successful, duration_ms, tokens);
        }
        self.daily
            .entry((date, bucket.to_string()))
            .or_default()
            .add(1, successful, duration_ms, tokens);

        self.dirty.store(true, Ordering::Release);
    }

    /// Drop daily buckets that fall out of the longest report window ending on `today`
    pub fn prune_daily(&self, today: NaiveDate) {
        let Some(cutoff) = today.checked_sub_days(Days::new(u64::from(MAX_USAGE_WINDOW_DAYS - 1)))
        else {
            return;
        };
        self.daily.retain(|(date, _), _| *date >= cutoff);
    }

    /// Whether counters changed since the last successful `persist`
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Write the current counters to the state store
    pub async fn persist(&self, store: &dyn StateStoreProvider) -> Result<()> {
        self.dirty.store(false, Ordering::Release);
        self.prune_daily(Utc::now().date_naive());

        let persisted = PersistedUsage {
            providers: self.snapshot().providers,
            daily: self.daily_rows(|_| true),
            recent_calls: self.calls().iter().cloned().collect(),
        };
        let data = serde_json::to_vec(&persisted)?;
        if let Err(e) = store.save(USAGE_STATE_KEY, &data).await {
            self.dirty.store(true, Ordering::Release);
            return Err(e);
        }
        Ok(())
    }

    /// Add previously persisted counters to this aggregator
    ///
    /// Returns the number of provider buckets restored.
    pub async fn restore(&self, store: &dyn StateStoreProvider) -> Result<usize> {
        let Some(data) = store.load(USAGE_STATE_KEY).await? else {
            return Ok(0);
        };
        let persisted: PersistedUsage = serde_json::from_slice(&data)?;

        for (provider, stat) in &persisted.providers {
            self.counters
                .entry(provider.clone())
                .or_default()
                .add_stat(stat);
        }
        for row in &persisted.daily {
            self.daily
                .entry((row.date, row.provider.clone()))
                .or_default()
                .add_stat(&row.stat);
        }
        self.prune_daily(Utc::now().date_naive());

        {
            let mut calls = self.calls();
            let restored = persisted.recent_calls.into_iter().chain(calls.drain(..));
            let mut merged: VecDeque<_> = restored.collect();
            while merged.len() > CALL_LOG_CAPACITY {
                merged.pop_front();
            }
            *calls = merged;
        }

        debug!(
            buckets = persisted.providers.len(),
            days = persisted.daily.len(),
            "Usage statistics restored"
        );
        Ok(persisted.providers.len())
    }

    fn daily_rows<F: Fn(NaiveDate) -> bool>(&self, keep: F) -> Vec<DailyUsage> {
        self.daily
            .iter()
            .filter(|entry| keep(entry.key().0))
            .map(|entry| DailyUsage {
                date: entry.key().0,
                provider: entry.key().1.clone(),
                stat: entry.value().stat(),
            })
            .collect()
    }
}

impl Default for UsageStatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageStatsInterface for UsageStatsAggregator {
    fn record(&self, provider: &str, success: bool, duration_ms: u64, tokens: Option<u64>) {
        self.record_on(Utc::now().date_naive(), provider, success, duration_ms, tokens);
    }

    fn log_call(&self, entry: CallLogEntry) {
        let mut calls = self.calls();
        if calls.len() >= CALL_LOG_CAPACITY {
            calls.pop_front();
        }
        calls.push_back(entry);
        self.dirty.store(true, Ordering::Release);
    }

    fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            providers: self
                .counters
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().stat()))
                .collect(),
        }
    }

    fn daily(&self, range: &DateRange) -> Vec<DailyUsage> {
        self.daily_rows(|date| range.contains(date))
    }

    fn recent_calls(&self, limit: usize) -> Vec<CallLogEntry> {
        self.calls().iter().rev().take(limit).cloned().collect()
    }
}
