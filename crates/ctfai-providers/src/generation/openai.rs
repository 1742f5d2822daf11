//! OpenAI-compatible Generation Adapter
//!
//! Implements the GenerationProvider port against the chat completions API.
//! Any backend that speaks the same protocol (DeepSeek, Qwen, GLM, vLLM,
//! ...) works by pointing `endpoint` at it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use ctfai_application::ports::registry::{GENERATION_PROVIDERS, GenerationProviderEntry};
use ctfai_domain::error::{Error, Result};
use ctfai_domain::ports::{CompletionRequest, GenerationProvider, RawCompletion};
use ctfai_domain::value_objects::ProviderConfig;

use crate::constants::{CONTENT_TYPE_JSON, OPENAI_DEFAULT_BASE_URL, OPENAI_DEFAULT_MODEL};
use crate::generation::helpers::{
    build_http_client, chat_messages, constructor, require_api_key, send_error, wire_temperature,
};
use crate::utils::HttpResponseUtils;

const PROVIDER_LABEL: &str = "OpenAI";

/// OpenAI-compatible generation adapter
///
/// Receives HTTP client via constructor injection.
///
/// ## Example
///
/// ```rust,no_run
/// use ctfai_providers::generation::OpenAIGenerationProvider;
/// use reqwest::Client;
///
/// let provider = OpenAIGenerationProvider::new(
///     Some("sk-your-api-key".to_string()),
///     Some("https://api.deepseek.com/v1".to_string()),
///     "deepseek-chat".to_string(),
///     Client::new(),
/// );
/// assert_eq!(provider.base_url(), "https://api.deepseek.com/v1");
/// ```
pub struct OpenAIGenerationProvider {
    api_key: Option<String>,
    base_url: String,
    model: String,
    http_client: Client,
}

impl OpenAIGenerationProvider {
    /// Create a new adapter
    ///
    /// # Arguments
    /// * `api_key` - API key; checked when a call is made
    /// * `base_url` - Optional custom base URL (defaults to OpenAI API)
    /// * `model` - Chat model name
    /// * `http_client` - Reqwest HTTP client for making API requests
    pub fn new(
        api_key: Option<String>,
        base_url: Option<String>,
        model: String,
        http_client: Client,
    ) -> Self {
        Self {
            api_key: constructor::validate_api_key(api_key.as_deref()),
            base_url: constructor::get_effective_url(base_url.as_deref(), OPENAI_DEFAULT_BASE_URL),
            model,
            http_client,
        }
    }

    /// Build the adapter from a stored provider config
    pub fn from_config(config: &ProviderConfig) -> std::result::Result<Self, String> {
        let base_url = constructor::validate_url(config.endpoint.as_deref())?;
        let model = constructor::model_or(config.model.as_deref(), OPENAI_DEFAULT_MODEL);
        Ok(Self::new(
            config.api_key.clone(),
            base_url,
            model,
            build_http_client()?,
        ))
    }

    /// Get the base URL for this adapter
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn parse_completion(data: &serde_json::Value) -> Result<RawCompletion> {
        let text = data["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                Error::malformed_response(format!(
                    "{PROVIDER_LABEL} response has no message content"
                ))
            })?;
        Ok(RawCompletion {
            text: text.to_string(),
            tokens_used: data["usage"]["completion_tokens"].as_u64(),
        })
    }
}

#[async_trait]
impl GenerationProvider for OpenAIGenerationProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<RawCompletion> {
        let api_key = require_api_key(self.api_key.as_deref(), PROVIDER_LABEL)?;
        let payload = serde_json::json!({
            "model": self.model,
            "messages": chat_messages(&request.system_prompt, &request.prompt),
            "max_tokens": request.max_tokens,
            "temperature": wire_temperature(request.temperature),
        });

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
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
            .get(format!("{}/models", self.base_url))
            .bearer_auth(api_key)
            .timeout(deadline)
            .send()
            .await
            .map_err(|e| send_error(&e, PROVIDER_LABEL, deadline))?;
        HttpResponseUtils::check_status(response, PROVIDER_LABEL).await?;
        Ok(())
    }

    fn provider_kind(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

fn openai_factory(
    config: &ProviderConfig,
) -> std::result::Result<Arc<dyn GenerationProvider>, String> {
    Ok(Arc::new(OpenAIGenerationProvider::from_config(config)?))
}

#[linkme::distributed_slice(GENERATION_PROVIDERS)]
static OPENAI_PROVIDER: GenerationProviderEntry = GenerationProviderEntry {
    name: "openai",
    description: "OpenAI-compatible chat completions (OpenAI, DeepSeek, Qwen, GLM, ERNIE, ...)",
    factory: openai_factory,
};
