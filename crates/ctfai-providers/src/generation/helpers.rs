//! Common helpers for generation adapters
//!
//! Shared functionality used across the HTTP-backed adapter implementations.

use std::time::Duration;

use ctfai_domain::error::{Error, Result};
use reqwest::Client;

use crate::constants::HTTP_CONNECT_TIMEOUT_SECS;

/// Common constructor patterns used by generation adapters
pub mod constructor {
    use reqwest::Url;

    /// Normalize an API key; blank keys count as absent
    pub fn validate_api_key(api_key: Option<&str>) -> Option<String> {
        api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
    }

    /// Validate and normalize an endpoint URL
    ///
    /// Blank values count as absent. Anything else must parse as an
    /// `http` or `https` URL; the trailing slash is removed.
    pub fn validate_url(url: Option<&str>) -> Result<Option<String>, String> {
        let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
            return Ok(None);
        };
        let parsed = Url::parse(url).map_err(|e| format!("invalid endpoint '{url}': {e}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!(
                "invalid endpoint '{url}': scheme must be http or https"
            ));
        }
        Ok(Some(url.trim_end_matches('/').to_string()))
    }

    /// Get effective URL with fallback to default
    pub fn get_effective_url(provided_url: Option<&str>, default_url: &str) -> String {
        provided_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| default_url.to_string())
    }

    /// Model name with fallback to the adapter default
    pub fn model_or(model: Option<&str>, default_model: &str) -> String {
        model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(default_model)
            .to_string()
    }
}

/// Build the HTTP client shared by every call of one adapter instance
///
/// No overall timeout is set on the client; each request carries the
/// deadline of the call it serves.
pub fn build_http_client() -> std::result::Result<Client, String> {
    Client::builder()
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {e}"))
}

/// Require a credential at call time
pub fn require_api_key<'a>(api_key: Option<&'a str>, provider: &str) -> Result<&'a str> {
    api_key.ok_or_else(|| Error::provider(format!("{provider} requires an api key")))
}

/// Map a transport error to the service error model
pub fn send_error(error: &reqwest::Error, provider: &str, deadline: Duration) -> Error {
    if error.is_timeout() {
        Error::timeout(u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX))
    } else if error.is_connect() {
        Error::provider(format!("{provider} is unreachable: {error}"))
    } else {
        Error::provider(format!("{provider} HTTP request failed: {error}"))
    }
}

/// Chat messages shared by the OpenAI-compatible and Ollama APIs
pub fn chat_messages(system_prompt: &str, prompt: &str) -> serde_json::Value {
    serde_json::json!([
        { "role": "system", "content": system_prompt },
        { "role": "user", "content": prompt }
    ])
}

/// Sampling temperature as sent on the wire, rounded to two decimals
pub fn wire_temperature(temperature: f32) -> f64 {
    (f64::from(temperature) * 100.0).round() / 100.0
}
