//! Request and response bodies of the generation API

use std::str::FromStr;

use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use ctfai_domain::constants::{DEFAULT_TEXT_MAX_TOKENS, DEFAULT_TEXT_TEMPERATURE};
use ctfai_domain::error::{ErrorKind, Result};
use ctfai_domain::value_objects::{
    ComparisonReport, GeneratedChallenge, GenerationFailure, GenerationOutcome, GenerationPayload,
    GenerationRequest, GenerationResult, TaskKind, TaskParams,
};

use crate::error::status_for;

/// `GET /ai-multi/providers`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersResponse {
    /// Enabled provider names in name order
    pub providers: Vec<String>,
}

/// `POST /ai-multi/generate-challenge`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateChallengeRequest {
    /// Challenge category (`Web`, `Pwn`, ...)
    pub challenge_type: String,
    /// Difficulty (`Easy`, `Medium`, `Hard`)
    pub difficulty: String,
    /// Extra requirements
    #[serde(default)]
    pub prompt: Option<String>,
    /// Explicit provider
    #[serde(default)]
    pub provider: Option<String>,
    /// Per-call deadline
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl From<GenerateChallengeRequest> for GenerationRequest {
    fn from(body: GenerateChallengeRequest) -> Self {
        GenerationRequest {
            params: TaskParams::Challenge {
                category: body.challenge_type,
                difficulty: body.difficulty,
                prompt: body.prompt.unwrap_or_default(),
            },
            provider: body.provider,
            timeout_ms: body.timeout_ms,
        }
    }
}

/// `POST /ai-multi/generate-flag`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateFlagRequest {
    /// Description of the challenge the flag is for
    pub challenge_description: String,
    /// Optional category hint
    #[serde(default)]
    pub challenge_type: Option<String>,
    /// Explicit provider
    #[serde(default)]
    pub provider: Option<String>,
    /// Per-call deadline
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl From<GenerateFlagRequest> for GenerationRequest {
    fn from(body: GenerateFlagRequest) -> Self {
        GenerationRequest {
            params: TaskParams::Flag {
                description: body.challenge_description,
                category: body.challenge_type.unwrap_or_default(),
            },
            provider: body.provider,
            timeout_ms: body.timeout_ms,
        }
    }
}

/// `POST /ai-multi/generate-text`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateTextRequest {
    /// Prompt
    pub prompt: String,
    /// Explicit provider
    #[serde(default)]
    pub provider: Option<String>,
    /// Token budget
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Per-call deadline
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl From<GenerateTextRequest> for GenerationRequest {
    fn from(body: GenerateTextRequest) -> Self {
        GenerationRequest {
            params: TaskParams::Text {
                prompt: body.prompt,
                max_tokens: body.max_tokens.unwrap_or(DEFAULT_TEXT_MAX_TOKENS),
                temperature: body.temperature.unwrap_or(DEFAULT_TEXT_TEMPERATURE),
            },
            provider: body.provider,
            timeout_ms: body.timeout_ms,
        }
    }
}

/// `POST /ai-multi/compare`
///
/// Carries the parameters of whichever task `task_type` names; the others
/// are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CompareRequest {
    /// `challenge`, `flag` or `text`
    pub task_type: String,
    /// Providers to compare, in report order
    pub providers: Vec<String>,
    /// Per-member deadline
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Challenge category, or flag category hint
    #[serde(default)]
    pub challenge_type: Option<String>,
    /// Challenge difficulty
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Challenge requirements or text prompt
    #[serde(default)]
    pub prompt: Option<String>,
    /// Flag challenge description
    #[serde(default)]
    pub challenge_description: Option<String>,
    /// Text token budget
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Text temperature
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl CompareRequest {
    /// Task parameters of the comparison
    ///
    /// Fails with `InvalidRequest` for an unknown task type. Missing task
    /// fields are left empty and rejected by task validation.
    pub fn task_params(&self) -> Result<TaskParams> {
        let params = match TaskKind::from_str(&self.task_type)? {
            TaskKind::Challenge => TaskParams::Challenge {
                category: self.challenge_type.clone().unwrap_or_default(),
                difficulty: self.difficulty.clone().unwrap_or_default(),
                prompt: self.prompt.clone().unwrap_or_default(),
            },
            TaskKind::Flag => TaskParams::Flag {
                description: self.challenge_description.clone().unwrap_or_default(),
                category: self.challenge_type.clone().unwrap_or_default(),
            },
            TaskKind::Text => TaskParams::Text {
                prompt: self.prompt.clone().unwrap_or_default(),
                max_tokens: self.max_tokens.unwrap_or(DEFAULT_TEXT_MAX_TOKENS),
                temperature: self.temperature.unwrap_or(DEFAULT_TEXT_TEMPERATURE),
            },
        };
        Ok(params)
    }
}

/// `generate-challenge` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeResponse {
    /// Provider that produced the challenge
    pub provider_used: String,
    /// Call duration
    pub generation_time_ms: u64,
    /// Normalized challenge
    pub challenge: GeneratedChallenge,
}

/// `generate-flag` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagResponse {
    /// Provider that produced the flag
    pub provider_used: String,
    /// Call duration
    pub generation_time_ms: u64,
    /// Normalized flag
    pub flag: String,
}

/// `generate-text` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextResponse {
    /// Provider that produced the text
    pub provider_used: String,
    /// Call duration
    pub generation_time_ms: u64,
    /// Completion tokens
    pub token_count: u64,
    /// Generated text
    pub text: String,
}

/// Body of a single-provider call that reached the provider and failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationFailureResponse {
    /// Provider that was called
    pub provider_used: String,
    /// Call duration
    pub generation_time_ms: u64,
    /// Failure kind
    pub error: ErrorKind,
    /// Failure detail
    pub message: String,
}

/// Reply of a single-provider generation route
pub enum GenerationReply<T> {
    /// 200 with the task specific body
    Success(T),
    /// 502/504 with the captured failure
    Failure(Status, GenerationFailureResponse),
}

impl<T> GenerationReply<T> {
    /// Build the reply for `result`, using `extract` to shape a success payload
    ///
    /// A payload `extract` cannot shape is reported as `MalformedResponse`.
    pub fn from_result<F>(result: GenerationResult, extract: F) -> Self
    where
        F: FnOnce(&GenerationResult, GenerationPayload) -> Option<T>,
    {
        let failure = match result.outcome.clone() {
            GenerationOutcome::Success(payload) => match extract(&result, payload) {
                Some(body) => return Self::Success(body),
                None => GenerationFailure::new(
                    ErrorKind::MalformedResponse,
                    "provider output does not match the task",
                ),
            },
            GenerationOutcome::Failure(failure) => failure,
        };
        let status = match failure.kind {
            ErrorKind::Timeout => status_for(ErrorKind::Timeout),
            _ => Status::BadGateway,
        };
        Self::Failure(
            status,
            GenerationFailureResponse {
                provider_used: result.provider,
                generation_time_ms: result.duration_ms,
                error: failure.kind,
                message: failure.message,
            },
        )
    }
}

impl<'r, T: Serialize> Responder<'r, 'static> for GenerationReply<T> {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        match self {
            Self::Success(body) => Json(body).respond_to(request),
            Self::Failure(status, body) => (status, Json(body)).respond_to(request),
        }
    }
}

/// One provider's entry in a comparison response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareEntry {
    /// `success` or `failure`
    pub status: String,
    /// Call duration
    pub duration_ms: u64,
    /// Normalized payload of a successful call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerationPayload>,
    /// Failure kind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    /// Failure detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&GenerationResult> for CompareEntry {
    fn from(result: &GenerationResult) -> Self {
        match &result.outcome {
            GenerationOutcome::Success(payload) => Self {
                status: "success".to_string(),
                duration_ms: result.duration_ms,
                result: Some(payload.clone()),
                error: None,
                message: None,
            },
            GenerationOutcome::Failure(failure) => Self {
                status: "failure".to_string(),
                duration_ms: result.duration_ms,
                result: None,
                error: Some(failure.kind),
                message: Some(failure.message.clone()),
            },
        }
    }
}

/// Comparison entries serialized as a JSON object in requested order
#[derive(Debug, Clone, Default)]
pub struct CompareResults(pub Vec<(String, CompareEntry)>);

impl Serialize for CompareResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (provider, entry) in &self.0 {
            map.serialize_entry(provider, entry)?;
        }
        map.end()
    }
}

/// `POST /ai-multi/compare` body
#[derive(Debug, Clone, Serialize)]
pub struct CompareResponse {
    /// Task that was compared
    pub task_type: TaskKind,
    /// End-to-end duration of the fan-out
    pub total_duration_ms: u64,
    /// Number of providers attempted
    pub models_compared: usize,
    /// Number of successful entries
    pub successful: usize,
    /// Entries keyed by provider, in requested order
    pub results: CompareResults,
}

impl From<&ComparisonReport> for CompareResponse {
    fn from(report: &ComparisonReport) -> Self {
        Self {
            task_type: report.params.kind(),
            total_duration_ms: report.total_duration_ms,
            models_compared: report.models_compared(),
            successful: report.success_count(),
            results: CompareResults(
                report
                    .entries
                    .iter()
                    .map(|e| (e.provider.clone(), CompareEntry::from(e)))
                    .collect(),
            ),
        }
    }
}
