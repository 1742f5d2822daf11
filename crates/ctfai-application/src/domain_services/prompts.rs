//! Prompt construction
//!
//! Generic, model-independent templates. Challenge and flag calls use the
//! provider's configured limits; text calls carry their own.

use std::fmt::Write as _;
use std::time::Duration;

use ctfai_domain::constants::{FLAG_MAX_TOKENS, FLAG_TEMPERATURE};
use ctfai_domain::ports::CompletionRequest;
use ctfai_domain::value_objects::{ProviderConfig, Task};

const CHALLENGE_SYSTEM_PROMPT: &str = "You are an expert designer of Capture-The-Flag security \
challenges. Reply with a single JSON object and nothing else, using the keys \"title\", \
\"description\", \"flag\" and \"hints\" (an array of strings). The flag must use the format \
flag{...}.";

const FLAG_SYSTEM_PROMPT: &str = "You generate flags for Capture-The-Flag challenges. Reply with \
the flag only, formatted as flag{...}, without any explanation.";

const TEXT_SYSTEM_PROMPT: &str = "You are a helpful assistant for a Capture-The-Flag platform.";

/// Build the adapter request for a validated task
pub fn build_completion_request(
    task: &Task,
    provider: &ProviderConfig,
    deadline: Duration,
) -> CompletionRequest {
    let (system_prompt, prompt, max_tokens, temperature) = match task {
        Task::Challenge {
            category,
            difficulty,
            prompt,
        } => {
            let mut text = format!(
                "Create a {difficulty} difficulty {category} CTF challenge with a realistic \
                 scenario and a clear path to the flag."
            );
            if let Some(extra) = prompt {
                let _ = write!(text, "\nAdditional requirements: {extra}");
            }
            (
                CHALLENGE_SYSTEM_PROMPT,
                text,
                provider.max_tokens,
                provider.temperature,
            )
        }
        Task::Flag {
            description,
            category,
        } => {
            let text = match category {
                Some(category) => format!(
                    "Generate a unique flag for this {category} challenge: {description}"
                ),
                None => format!("Generate a unique flag for this challenge: {description}"),
            };
            (FLAG_SYSTEM_PROMPT, text, FLAG_MAX_TOKENS, FLAG_TEMPERATURE)
        }
        Task::Text {
            prompt,
            max_tokens,
            temperature,
        } => (TEXT_SYSTEM_PROMPT, prompt.clone(), *max_tokens, *temperature),
    };

    CompletionRequest {
        task: task.kind(),
        system_prompt: system_prompt.to_string(),
        prompt,
        max_tokens,
        temperature,
        deadline,
    }
}
