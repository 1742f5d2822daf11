//! Request and response bodies of the admin API

use serde::{Deserialize, Serialize};

use ctfai_domain::value_objects::{CallLogEntry, ProviderView};

/// `GET /ai-admin/providers`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderListResponse {
    /// Provider views ordered by name
    pub providers: Vec<ProviderView>,
}

/// Acknowledgement of a delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always true; failures are error responses
    pub success: bool,
    /// Deleted provider
    pub provider: String,
}

/// `POST /ai-admin/init-default-providers`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedResponse {
    /// Providers created by this call
    pub created: Vec<String>,
}

/// `PUT /ai-admin/default-provider/<name>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultProviderResponse {
    /// New default provider
    pub default_provider: String,
}

/// `GET /ai-admin/call-log`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallLogResponse {
    /// Recent calls, newest first
    pub calls: Vec<CallLogEntry>,
}
