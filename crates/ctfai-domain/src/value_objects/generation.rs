//! Generation request and result value objects

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_MAX_TOKENS, MAX_TEMPERATURE, MIN_MAX_TOKENS, MIN_TEMPERATURE};
use crate::error::{Error, ErrorKind, Result};

/// Kind of content a generation call produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Full challenge (title, description, flag, hints)
    Challenge,
    /// A single flag string
    Flag,
    /// Free text
    Text,
}

impl TaskKind {
    /// Wire name of the task kind
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Challenge => "challenge",
            Self::Flag => "flag",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "challenge" => Ok(Self::Challenge),
            "flag" => Ok(Self::Flag),
            "text" => Ok(Self::Text),
            other => Err(Error::invalid_request(format!(
                "unknown task type '{other}', expected challenge, flag or text"
            ))),
        }
    }
}

/// Challenge category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeCategory {
    /// Web exploitation
    Web,
    /// Binary exploitation
    Pwn,
    /// Reverse engineering
    Reverse,
    /// Cryptography
    Crypto,
    /// Everything else
    Misc,
}

impl ChallengeCategory {
    /// All categories in display order
    pub const ALL: [Self; 5] = [Self::Web, Self::Pwn, Self::Reverse, Self::Crypto, Self::Misc];

    /// Canonical name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "Web",
            Self::Pwn => "Pwn",
            Self::Reverse => "Reverse",
            Self::Crypto => "Crypto",
            Self::Misc => "Misc",
        }
    }
}

impl fmt::Display for ChallengeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChallengeCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                Error::invalid_request(format!(
                    "invalid challenge type '{wanted}', expected one of Web, Pwn, Reverse, Crypto, Misc"
                ))
            })
    }
}

/// Challenge difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Entry level
    Easy,
    /// Intermediate
    Medium,
    /// Advanced
    Hard,
}

impl Difficulty {
    /// All difficulties in ascending order
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Canonical name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                Error::invalid_request(format!(
                    "invalid difficulty '{wanted}', expected one of Easy, Medium, Hard"
                ))
            })
    }
}

/// Task parameters as received from a caller, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "lowercase")]
pub enum TaskParams {
    /// Challenge generation
    Challenge {
        /// Challenge category
        category: String,
        /// Challenge difficulty
        difficulty: String,
        /// Extra requirements, may be empty
        #[serde(default)]
        prompt: String,
    },
    /// Flag generation
    Flag {
        /// Description of the challenge the flag belongs to
        description: String,
        /// Optional category hint
        #[serde(default)]
        category: String,
    },
    /// Free text generation
    Text {
        /// Prompt
        prompt: String,
        /// Token budget
        max_tokens: u32,
        /// Sampling temperature
        temperature: f32,
    },
}

impl TaskParams {
    /// Kind of task these parameters describe
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Challenge { .. } => TaskKind::Challenge,
            Self::Flag { .. } => TaskKind::Flag,
            Self::Text { .. } => TaskKind::Text,
        }
    }

    /// Validate the parameters and produce a typed [`Task`]
    pub fn validate(&self) -> Result<Task> {
        match self {
            Self::Challenge {
                category,
                difficulty,
                prompt,
            } => {
                require_non_empty("challenge_type", category)?;
                require_non_empty("difficulty", difficulty)?;
                Ok(Task::Challenge {
                    category: category.parse()?,
                    difficulty: difficulty.parse()?,
                    prompt: non_empty(prompt),
                })
            }
            Self::Flag {
                description,
                category,
            } => {
                require_non_empty("challenge_description", description)?;
                Ok(Task::Flag {
                    description: description.trim().to_string(),
                    category: non_empty(category),
                })
            }
            Self::Text {
                prompt,
                max_tokens,
                temperature,
            } => {
                require_non_empty("prompt", prompt)?;
                if !(MIN_MAX_TOKENS..=MAX_MAX_TOKENS).contains(max_tokens) {
                    return Err(Error::invalid_request(format!(
                        "max_tokens must be between {MIN_MAX_TOKENS} and {MAX_MAX_TOKENS}"
                    )));
                }
                if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(temperature) {
                    return Err(Error::invalid_request(format!(
                        "temperature must be between {MIN_TEMPERATURE} and {MAX_TEMPERATURE}"
                    )));
                }
                Ok(Task::Text {
                    prompt: prompt.trim().to_string(),
                    max_tokens: *max_tokens,
                    temperature: *temperature,
                })
            }
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_request(format!("{field} is required")));
    }
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Validated task
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Challenge generation
    Challenge {
        /// Category
        category: ChallengeCategory,
        /// Difficulty
        difficulty: Difficulty,
        /// Extra requirements
        prompt: Option<String>,
    },
    /// Flag generation
    Flag {
        /// Trimmed challenge description
        description: String,
        /// Optional category hint
        category: Option<String>,
    },
    /// Free text generation
    Text {
        /// Trimmed prompt
        prompt: String,
        /// Token budget
        max_tokens: u32,
        /// Sampling temperature
        temperature: f32,
    },
}

impl Task {
    /// Kind of this task
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Challenge { .. } => TaskKind::Challenge,
            Self::Flag { .. } => TaskKind::Flag,
            Self::Text { .. } => TaskKind::Text,
        }
    }
}

/// A single generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// What to generate
    pub params: TaskParams,
    /// Explicit provider; the registry default applies when absent
    #[serde(default)]
    pub provider: Option<String>,
    /// Per-call deadline
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl GenerationRequest {
    /// Create a request for the given parameters
    pub fn new(params: TaskParams) -> Self {
        Self {
            params,
            provider: None,
            timeout_ms: None,
        }
    }

    /// Challenge generation request
    pub fn challenge<C, D, P>(category: C, difficulty: D, prompt: P) -> Self
    where
        C: Into<String>,
        D: Into<String>,
        P: Into<String>,
    {
        Self::new(TaskParams::Challenge {
            category: category.into(),
            difficulty: difficulty.into(),
            prompt: prompt.into(),
        })
    }

    /// Flag generation request
    pub fn flag<D: Into<String>, C: Into<String>>(description: D, category: C) -> Self {
        Self::new(TaskParams::Flag {
            description: description.into(),
            category: category.into(),
        })
    }

    /// Free text generation request
    pub fn text<P: Into<String>>(prompt: P, max_tokens: u32, temperature: f32) -> Self {
        Self::new(TaskParams::Text {
            prompt: prompt.into(),
            max_tokens,
            temperature,
        })
    }

    /// Target an explicit provider
    pub fn with_provider<S: Into<String>>(mut self, provider: S) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Set the per-call deadline
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Explicit provider name, ignoring blank values
    pub fn explicit_provider(&self) -> Option<&str> {
        self.provider
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Validate the per-call deadline
    pub fn validate_timeout(&self) -> Result<()> {
        if self.timeout_ms == Some(0) {
            return Err(Error::invalid_request("timeout_ms must be greater than 0"));
        }
        Ok(())
    }
}

/// Normalized challenge content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedChallenge {
    /// Title
    pub title: String,
    /// Description shown to players
    pub description: String,
    /// Normalized flag
    pub flag: String,
    /// Optional hints
    #[serde(default)]
    pub hints: Vec<String>,
}

/// Normalized output of a successful call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationPayload {
    /// Challenge output
    Challenge(GeneratedChallenge),
    /// Text output
    Text {
        /// Generated text
        text: String,
        /// Completion tokens
        token_count: u64,
    },
    /// Flag output
    Flag {
        /// Normalized flag
        flag: String,
    },
}

/// Failure detail of an unsuccessful call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationFailure {
    /// Failure category
    pub kind: ErrorKind,
    /// Human readable detail
    pub message: String,
}

impl GenerationFailure {
    /// Create a failure
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&Error> for GenerationFailure {
    fn from(error: &Error) -> Self {
        Self::new(error.kind(), error.to_string())
    }
}

/// Success or failure of a call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Normalized payload
    Success(GenerationPayload),
    /// Captured failure
    Failure(GenerationFailure),
}

/// Result of one provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Provider that handled (or was meant to handle) the call
    pub provider: String,
    /// Task kind
    pub task: TaskKind,
    /// Wall-clock duration of the call
    pub duration_ms: u64,
    /// Outcome
    pub outcome: GenerationOutcome,
}

impl GenerationResult {
    /// Successful result
    pub fn success<S: Into<String>>(
        provider: S,
        task: TaskKind,
        duration_ms: u64,
        payload: GenerationPayload,
    ) -> Self {
        Self {
            provider: provider.into(),
            task,
            duration_ms,
            outcome: GenerationOutcome::Success(payload),
        }
    }

    /// Failed result
    pub fn failure<S: Into<String>>(
        provider: S,
        task: TaskKind,
        duration_ms: u64,
        failure: GenerationFailure,
    ) -> Self {
        Self {
            provider: provider.into(),
            task,
            duration_ms,
            outcome: GenerationOutcome::Failure(failure),
        }
    }

    /// Whether the call succeeded
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, GenerationOutcome::Success(_))
    }

    /// Payload of a successful call
    pub fn payload(&self) -> Option<&GenerationPayload> {
        match &self.outcome {
            GenerationOutcome::Success(payload) => Some(payload),
            GenerationOutcome::Failure(_) => None,
        }
    }

    /// Failure detail of an unsuccessful call
    pub fn failure_detail(&self) -> Option<&GenerationFailure> {
        match &self.outcome {
            GenerationOutcome::Success(_) => None,
            GenerationOutcome::Failure(failure) => Some(failure),
        }
    }
}
