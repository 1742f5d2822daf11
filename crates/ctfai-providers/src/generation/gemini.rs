//! Gemini Generation Adapter
//!
//! Implements the GenerationProvider port using Google's Generative
//! Language API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use ctfai_application::ports::registry::{GENERATION_PROVIDERS, GenerationProviderEntry};
use ctfai_domain::error::{Error, Result};
use ctfai_domain::ports::{CompletionRequest, GenerationProvider, RawCompletion};
use ctfai_domain::value_objects::ProviderConfig;

use crate::constants::{CONTENT_TYPE_JSON, GEMINI_DEFAULT_BASE_URL, GEMINI_DEFAULT_MODEL};
use crate::generation::helpers::{
    build_http_client, constructor, require_api_key, send_error, wire_temperature,
};
use crate::utils::HttpResponseUtils;

const PROVIDER_LABEL: &str = "Gemini";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini generation adapter
pub struct GeminiGenerationProvider {
    api_key: Option<String>,
    base_url: String,
    model: String,
    http_client: Client,
}

impl GeminiGenerationProvider {
    /// Create a new adapter
    ///
    /// # Arguments
    /// * `api_key` - Google AI API key; checked when a call is made
    /// * `base_url` - Optional custom base URL including the API version
    /// * `model` - Model name, with or without the `models/` prefix
    /// * `http_client` - Reqwest HTTP client for making API requests
    pub fn new(
        api_key: Option<String>,
        base_url: Option<String>,
        model: String,
        http_client: Client,
    ) -> Self {
        Self {
            api_key: constructor::validate_api_key(api_key.as_deref()),
            base_url: constructor::get_effective_url(base_url.as_deref(), GEMINI_DEFAULT_BASE_URL),
            model,
            http_client,
        }
    }

    /// Build the adapter from a stored provider config
    pub fn from_config(config: &ProviderConfig) -> std::result::Result<Self, String> {
        let base_url = constructor::validate_url(config.endpoint.as_deref())?;
        let model = constructor::model_or(config.model.as_deref(), GEMINI_DEFAULT_MODEL);
        Ok(Self::new(
            config.api_key.clone(),
            base_url,
            model,
            build_http_client()?,
        ))
    }

    /// Get the model name for API calls (remove prefix if present)
    pub fn api_model_name(&self) -> &str {
        self.model.strip_prefix("models/").unwrap_or(&self.model)
    }

    /// Get the base URL for this adapter
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn parse_completion(data: &serde_json::Value) -> Result<RawCompletion> {
        let parts = data["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| {
                Error::malformed_response(format!("{PROVIDER_LABEL} response has no candidates"))
            })?;
        let text: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();
        Ok(RawCompletion {
            text,
            tokens_used: data["usageMetadata"]["candidatesTokenCount"].as_u64(),
        })
    }
}

#[async_trait]
impl GenerationProvider for GeminiGenerationProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<RawCompletion> {
        let api_key = require_api_key(self.api_key.as_deref(), PROVIDER_LABEL)?;
        let payload = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": request.system_prompt }] },
            "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
            "generationConfig": {
                "maxOutputTokens": request.max_tokens,
                "temperature": wire_temperature(request.temperature),
            }
        });

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url,
            self.api_model_name()
        );
        let response = self
            .http_client
            .post(&url)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header(API_KEY_HEADER, api_key)
            .timeout(request.deadline)
            .json(&payload)
            .send()
            .await
            .map_err(|e| send_error(&e, PROVIDER_LABEL, request.deadline))?;

        let data = HttpResponseUtils::check_and_parse(response, PROVIDER_LABEL).await?;
        Self::parse_completion(&data)
    }

    async fn ping(&self, deadline: Duration) -> Result<()> {
        let api_key = require_api_key(self.api_key.as_deref(), PROVIDER_LABEL)?;
        let response = self
            .http_client
            .get(format!("{}/models/{}", self.base_url, self.api_model_name()))
            .header(API_KEY_HEADER, api_key)
            .timeout(deadline)
            .send()
            .await
            .map_err(|e| send_error(&e, PROVIDER_LABEL, deadline))?;
        HttpResponseUtils::check_status(response, PROVIDER_LABEL).await?;
        Ok(())
    }

    fn provider_kind(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

fn gemini_factory(
    config: &ProviderConfig,
) -> std::result::Result<Arc<dyn GenerationProvider>, String> {
    Ok(Arc::new(GeminiGenerationProvider::from_config(config)?))
}

#[linkme::distributed_slice(GENERATION_PROVIDERS)]
static GEMINI_PROVIDER: GenerationProviderEntry = GenerationProviderEntry {
    name: "gemini",
    description: "Google Gemini generateContent API",
    factory: gemini_factory,
};
