//! Adapter output normalization
//!
//! Turns raw completion text into the task-specific payload. Output that
//! cannot be turned into the expected shape is a `MalformedResponse`.

use serde::Deserialize;
use serde_json::Value;

use ctfai_domain::constants::FLAG_PREFIX;
use ctfai_domain::error::{Error, Result};
use ctfai_domain::ports::RawCompletion;
use ctfai_domain::value_objects::{GeneratedChallenge, GenerationPayload, TaskKind};

/// Normalize raw output for the given task kind
pub fn normalize_completion(task: TaskKind, raw: &RawCompletion) -> Result<GenerationPayload> {
    match task {
        TaskKind::Challenge => normalize_challenge(&raw.text).map(GenerationPayload::Challenge),
        TaskKind::Flag => normalize_flag(&raw.text).map(|flag| GenerationPayload::Flag { flag }),
        TaskKind::Text => {
            let text = raw.text.trim();
            if text.is_empty() {
                return Err(Error::malformed_response("provider returned empty text"));
            }
            let words = text.split_whitespace().count() as u64;
            let token_count = raw.tokens_used.filter(|t| *t > 0).unwrap_or(words);
            Ok(GenerationPayload::Text {
                text: text.to_string(),
                token_count,
            })
        }
    }
}

/// Normalize a flag
///
/// Takes the first non-empty line, strips quoting, keeps an embedded
/// `flag{...}` as is and wraps anything else as `flag{...}`. A flag whose
/// braces hold nothing but whitespace is a `MalformedResponse`.
pub fn normalize_flag(raw: &str) -> Result<String> {
    let empty = || Error::malformed_response("provider returned an empty flag");
    let line = raw
        .lines()
        .map(|l| l.trim().trim_matches(|c| matches!(c, '"' | '\'' | '`')).trim())
        .find(|l| !l.is_empty())
        .ok_or_else(empty)?;

    let body = match line.find(FLAG_PREFIX) {
        Some(start) => {
            let rest = &line[start + FLAG_PREFIX.len()..];
            match rest.find('}') {
                Some(end) if rest[..end].trim().is_empty() => return Err(empty()),
                Some(end) => return Ok(line[start..=start + FLAG_PREFIX.len() + end].to_string()),
                // Unterminated: the text after the prefix is the flag body
                None => rest,
            }
        }
        None => line,
    };

    let inner: String = body
        .trim()
        .chars()
        .filter(|c| !matches!(c, '{' | '}'))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    if inner.is_empty() {
        return Err(empty());
    }
    Ok(format!("{FLAG_PREFIX}{inner}}}"))
}

#[derive(Deserialize)]
struct RawChallenge {
    title: Option<String>,
    description: Option<String>,
    flag: Option<String>,
    #[serde(default)]
    hints: Vec<String>,
}

/// Normalize a challenge
///
/// The first JSON object in the output is used, so surrounding prose and
/// code fences are tolerated. `title`, `description` and `flag` are
/// required.
pub fn normalize_challenge(raw: &str) -> Result<GeneratedChallenge> {
    let object = extract_json_object(raw)
        .ok_or_else(|| Error::malformed_response("no JSON object in challenge output"))?;
    let parsed: RawChallenge = serde_json::from_value(object).map_err(|e| {
        Error::malformed_response(format!("challenge JSON has unexpected shape: {e}"))
    })?;

    let title = required_field("title", parsed.title)?;
    let description = required_field("description", parsed.description)?;
    let flag = normalize_flag(&required_field("flag", parsed.flag)?)?;
    let hints = parsed
        .hints
        .into_iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect();

    Ok(GeneratedChallenge {
        title,
        description,
        flag,
        hints,
    })
}

fn required_field(name: &str, value: Option<String>) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::malformed_response(format!("challenge JSON is missing '{name}'")))
}

fn extract_json_object(raw: &str) -> Option<Value> {
    raw.match_indices('{').find_map(|(start, _)| {
        serde_json::Deserializer::from_str(&raw[start..])
            .into_iter::<Value>()
            .next()
            .and_then(std::result::Result::ok)
            .filter(Value::is_object)
    })
}
