//! Ollama Generation Adapter
//!
//! Implements the GenerationProvider port against a local Ollama server.
//! No credential is needed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use ctfai_application::ports::registry::{GENERATION_PROVIDERS, GenerationProviderEntry};
use ctfai_domain::error::{Error, Result};
use ctfai_domain::ports::{CompletionRequest, GenerationProvider, RawCompletion};
use ctfai_domain::value_objects::ProviderConfig;

use crate::constants::{CONTENT_TYPE_JSON, OLLAMA_DEFAULT_MODEL, OLLAMA_DEFAULT_PORT};
use crate::generation::helpers::{
    build_http_client, chat_messages, constructor, send_error, wire_temperature,
};
use crate::utils::HttpResponseUtils;

const PROVIDER_LABEL: &str = "Ollama";

/// Ollama generation adapter
pub struct OllamaGenerationProvider {
    base_url: String,
    model: String,
    http_client: Client,
}

impl OllamaGenerationProvider {
    /// Create a new adapter
    ///
    /// # Arguments
    /// * `base_url` - Ollama server URL (defaults to localhost)
    /// * `model` - Model name (e.g., "llama3")
    /// * `http_client` - Reqwest HTTP client for making API requests
    pub fn new(base_url: Option<String>, model: String, http_client: Client) -> Self {
        let default_url = format!("http://localhost:{OLLAMA_DEFAULT_PORT}");
        Self {
            base_url: constructor::get_effective_url(base_url.as_deref(), &default_url),
            model,
            http_client,
        }
    }

    /// Build the adapter from a stored provider config
    pub fn from_config(config: &ProviderConfig) -> std::result::Result<Self, String> {
        let base_url = constructor::validate_url(config.endpoint.as_deref())?;
        let model = constructor::model_or(config.model.as_deref(), OLLAMA_DEFAULT_MODEL);
        Ok(Self::new(base_url, model, build_http_client()?))
    }

    /// Get the base URL for this adapter
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn parse_completion(data: &serde_json::Value) -> Result<RawCompletion> {
        let text = data["message"]["content"].as_str().ok_or_else(|| {
            Error::malformed_response(format!("{PROVIDER_LABEL} response has no message content"))
        })?;
        Ok(RawCompletion {
            text: text.to_string(),
            tokens_used: data["eval_count"].as_u64(),
        })
    }
}

#[async_trait]
impl GenerationProvider for OllamaGenerationProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<RawCompletion> {
        let payload = serde_json::json!({
            "model": self.model,
            "messages": chat_messages(&request.system_prompt, &request.prompt),
            "stream": false,
            "options": {
                "num_predict": request.max_tokens,
                "temperature": wire_temperature(request.temperature),
            }
        });

        let response = self
            .http_client
            .post(format!("{}/api/chat", self.base_url))
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
        let response = self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(deadline)
            .send()
            .await
            .map_err(|e| send_error(&e, PROVIDER_LABEL, deadline))?;
        HttpResponseUtils::check_status(response, PROVIDER_LABEL).await?;
        Ok(())
    }

    fn provider_kind(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

fn ollama_factory(
    config: &ProviderConfig,
) -> std::result::Result<Arc<dyn GenerationProvider>, String> {
    Ok(Arc::new(OllamaGenerationProvider::from_config(config)?))
}

#[linkme::distributed_slice(GENERATION_PROVIDERS)]
static OLLAMA_PROVIDER: GenerationProviderEntry = GenerationProviderEntry {
    name: "ollama",
    description: "Ollama local chat API",
    factory: ollama_factory,
};
