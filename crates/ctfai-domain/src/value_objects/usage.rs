//! Usage statistics value objects

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_USAGE_WINDOW_DAYS;
use crate::error::{Error, ErrorKind, Result};
use crate::value_objects::generation::{GenerationFailure, TaskKind};

/// Point-in-time statistics of one provider
///
/// Only the counters are persisted; derived fields are recomputed by
/// [`UsageStat::from_counters`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStat {
    /// Completed calls
    pub total_calls: u64,
    /// Successful calls
    pub successful_calls: u64,
    /// Failed calls
    #[serde(default)]
    pub failed_calls: u64,
    /// Cumulative call duration
    pub total_duration_ms: u64,
    /// Cumulative tokens reported by adapters
    #[serde(default)]
    pub total_tokens: u64,
    /// `successful_calls / total_calls`, 0 when no calls were made
    #[serde(default)]
    pub success_rate: f64,
    /// `total_duration_ms / total_calls`, 0 when no calls were made
    #[serde(default)]
    pub average_duration_ms: f64,
}

impl UsageStat {
    /// Build a stat from raw counters
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counters(
        total_calls: u64,
        successful_calls: u64,
        total_duration_ms: u64,
        total_tokens: u64,
    ) -> Self {
        let (success_rate, average_duration_ms) = if total_calls > 0 {
            (
                successful_calls as f64 / total_calls as f64,
                total_duration_ms as f64 / total_calls as f64,
            )
        } else {
            (0.0, 0.0)
        };
        Self {
            total_calls,
            successful_calls,
            failed_calls: total_calls.saturating_sub(successful_calls),
            total_duration_ms,
            total_tokens,
            success_rate,
            average_duration_ms,
        }
    }
}

impl Default for UsageStat {
    fn default() -> Self {
        Self::from_counters(0, 0, 0, 0)
    }
}

/// Statistics of every provider that has recorded calls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Per-provider stats keyed by provider name
    pub providers: BTreeMap<String, UsageStat>,
}

impl UsageSnapshot {
    /// Stats of one provider
    pub fn get(&self, provider: &str) -> Option<&UsageStat> {
        self.providers.get(provider)
    }

    /// Totals across all providers
    pub fn summary(&self) -> UsageStat {
        total_of(self.providers.values())
    }
}

fn total_of<'a, I: Iterator<Item = &'a UsageStat>>(stats: I) -> UsageStat {
    let (total, successful, duration, tokens) =
        stats.fold((0u64, 0u64, 0u64, 0u64), |(t, s, d, k), stat| {
            (
                t + stat.total_calls,
                s + stat.successful_calls,
                d + stat.total_duration_ms,
                k + stat.total_tokens,
            )
        });
    UsageStat::from_counters(total, successful, duration, tokens)
}

/// Inclusive range of UTC days covered by a usage report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the window
    pub start_date: NaiveDate,
    /// Last day of the window
    pub end_date: NaiveDate,
    /// Window length in days
    pub days: u32,
}

impl DateRange {
    /// The `days` long window ending on `end_date`
    ///
    /// Windows longer than [`MAX_USAGE_WINDOW_DAYS`] are shortened to it; an
    /// empty window is `InvalidRequest`.
    pub fn ending_on(end_date: NaiveDate, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(Error::invalid_request("days must be at least 1"));
        }
        let days = days.min(MAX_USAGE_WINDOW_DAYS);
        let start_date = end_date
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .unwrap_or(NaiveDate::MIN);
        Ok(Self {
            start_date,
            end_date,
            days,
        })
    }

    /// Whether `date` falls inside the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start_date..=self.end_date).contains(&date)
    }
}

/// Usage of one provider on one UTC day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyUsage {
    /// Day the calls completed on
    pub date: NaiveDate,
    /// Provider bucket
    pub provider: String,
    /// Counters for that day
    #[serde(flatten)]
    pub stat: UsageStat,
}

/// Usage statistics served to administrators
///
/// `providers` and `summary` are cumulative since the counters were first
/// persisted; `daily_stats` and `window_summary` cover `date_range` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    /// Cumulative per-provider stats
    pub providers: BTreeMap<String, UsageStat>,
    /// Cumulative totals across the listed providers
    pub summary: UsageStat,
    /// Per-day stats, newest day first, then by provider name
    pub daily_stats: Vec<DailyUsage>,
    /// Totals across `daily_stats`
    pub window_summary: UsageStat,
    /// Days covered by `daily_stats`
    pub date_range: DateRange,
}

impl UsageReport {
    /// Assemble a report from cumulative stats and the daily rows of a window
    pub fn new(snapshot: UsageSnapshot, mut daily_stats: Vec<DailyUsage>, date_range: DateRange) -> Self {
        daily_stats.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.provider.cmp(&b.provider)));
        let summary = snapshot.summary();
        let window_summary = total_of(daily_stats.iter().map(|d| &d.stat));
        Self {
            providers: snapshot.providers,
            summary,
            daily_stats,
            window_summary,
            date_range,
        }
    }
}

/// One completed provider call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLogEntry {
    /// Completion time
    pub timestamp: DateTime<Utc>,
    /// Provider that served the call
    pub provider: String,
    /// Task kind
    pub task: TaskKind,
    /// Call duration
    pub duration_ms: u64,
    /// Whether the call produced a usable result
    pub success: bool,
    /// Failure category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    /// Failure detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CallLogEntry {
    /// Entry for a successful call completed now
    pub fn success<S: Into<String>>(provider: S, task: TaskKind, duration_ms: u64) -> Self {
        Self {
            timestamp: Utc::now(),
            provider: provider.into(),
            task,
            duration_ms,
            success: true,
            error: None,
            message: None,
        }
    }

    /// Entry for a failed call completed now
    pub fn failure<S: Into<String>>(
        provider: S,
        task: TaskKind,
        duration_ms: u64,
        failure: &GenerationFailure,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            provider: provider.into(),
            task,
            duration_ms,
            success: false,
            error: Some(failure.kind),
            message: Some(failure.message.clone()),
        }
    }
}
