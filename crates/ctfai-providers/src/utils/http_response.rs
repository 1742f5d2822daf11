//! HTTP Response Utilities
//!
//! Helper functions for processing HTTP responses from API providers.
//! These are shared utilities, not ports.

use ctfai_domain::error::{Error, Result};
use reqwest::Response;

use crate::constants::ERROR_BODY_MAX_LEN;

/// Format error message for a generation backend
fn provider_error(provider: &str, context: &str, details: &str) -> Error {
    let details = truncate(details.trim(), ERROR_BODY_MAX_LEN);
    Error::provider(format!("{provider} {context}: {details}"))
}

fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Utilities for processing HTTP responses
///
/// Provides common response handling patterns used by generation adapters.
pub struct HttpResponseUtils;

impl HttpResponseUtils {
    /// Check response status and parse JSON
    ///
    /// # Arguments
    /// * `response` - The HTTP response to check
    /// * `provider_name` - Name of the backend for error messages
    ///
    /// # Returns
    /// Parsed JSON value on success. Non-2xx statuses are `Provider` errors;
    /// a 2xx body that is not JSON is a `MalformedResponse`.
    pub async fn check_and_parse(
        response: Response,
        provider_name: &str,
    ) -> Result<serde_json::Value> {
        Self::check_status(response, provider_name)
            .await?
            .json()
            .await
            .map_err(|e| {
                Error::malformed_response(format!("{provider_name} response parse failed: {e}"))
            })
    }

    /// Check response status, keeping the body unread on success
    pub async fn check_status(response: Response, provider_name: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let code = status.as_u16();

        Err(match code {
            401 | 403 => provider_error(provider_name, "authentication failed", &error_text),
            429 => provider_error(provider_name, "rate limit exceeded", &error_text),
            500..=599 => provider_error(
                provider_name,
                &format!("server error ({code})"),
                &error_text,
            ),
            _ => provider_error(
                provider_name,
                &format!("request failed ({code})"),
                &error_text,
            ),
        })
    }
}
