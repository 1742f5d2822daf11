//! Health checks
//!
//! Summarizes whether the registry has a usable provider and whether the
//! state store answers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::bootstrap::AppContext;
use crate::constants::HEALTH_CHECK_KEY;
use ctfai_application::utils::TimedOperation;
use ctfai_domain::ports::StateStoreProvider;

/// Health status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Fully operational
    Up,
    /// Operational, but requests may fail
    Degraded,
    /// Not operational
    Down,
}

impl HealthStatus {
    /// Check if the service is operational (healthy or degraded)
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::Up | Self::Degraded)
    }
}

/// Individual health check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Current status
    pub status: HealthStatus,
    /// Response time in milliseconds
    pub response_time_ms: u64,
    /// Failure or degradation detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Overall health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Worst status among the checks
    pub status: HealthStatus,
    /// Time of the check
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Crate version
    pub version: String,
    /// Individual checks by name
    pub checks: BTreeMap<String, HealthCheck>,
}

/// Run every health check against `context`
pub async fn check_health(context: &AppContext) -> HealthResponse {
    let mut checks = BTreeMap::new();

    let timer = TimedOperation::start();
    let enabled = context.registry().list_enabled().len();
    let providers = if enabled == 0 {
        HealthCheck {
            status: HealthStatus::Degraded,
            response_time_ms: timer.elapsed_ms(),
            detail: Some("no enabled provider".to_string()),
        }
    } else {
        HealthCheck {
            status: HealthStatus::Up,
            response_time_ms: timer.elapsed_ms(),
            detail: Some(format!("{enabled} enabled")),
        }
    };
    checks.insert("providers".to_string(), providers);

    let timer = TimedOperation::start();
    let store = match context.state_store().load(HEALTH_CHECK_KEY).await {
        Ok(_) => HealthCheck {
            status: HealthStatus::Up,
            response_time_ms: timer.elapsed_ms(),
            detail: None,
        },
        Err(e) => HealthCheck {
            status: HealthStatus::Down,
            response_time_ms: timer.elapsed_ms(),
            detail: Some(e.to_string()),
        },
    };
    checks.insert("state_store".to_string(), store);

    for (name, check) in &checks {
        match check.status {
            HealthStatus::Up => debug!(component = %name, "Health check passed"),
            _ => error!(
                component = %name,
                details = check.detail.as_deref().unwrap_or("unknown failure"),
                "Health check failed"
            ),
        }
    }

    let status = checks
        .values()
        .map(|c| c.status)
        .max_by_key(|s| match s {
            HealthStatus::Up => 0,
            HealthStatus::Degraded => 1,
            HealthStatus::Down => 2,
        })
        .unwrap_or(HealthStatus::Up);

    HealthResponse {
        status,
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    }
}
