//! Provider Constants
//!
//! Constants specific to provider implementations. Domain limits live in
//! `ctfai-domain`.

// ============================================================================
// HTTP CONSTANTS
// ============================================================================

/// JSON content type
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// TCP connect timeout for API providers (seconds)
pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Maximum length of a backend error body kept in error messages
pub const ERROR_BODY_MAX_LEN: usize = 512;

// ============================================================================
// GENERATION ADAPTER DEFAULTS
// ============================================================================

/// OpenAI API base URL
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI default chat model
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Gemini API base URL
pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini default model
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Ollama server default port
pub const OLLAMA_DEFAULT_PORT: u16 = 11434;

/// Ollama default model
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3";

/// Model name reported by the echo adapter
pub const ECHO_MODEL: &str = "echo";

/// Flag returned by the echo adapter
pub const ECHO_FLAG: &str = "flag{echo}";

// ============================================================================
// STATE STORE CONSTANTS
// ============================================================================

/// File extension of filesystem state entries
pub const STATE_FILE_EXTENSION: &str = "json";

/// Suffix of in-progress filesystem writes
pub const STATE_TEMP_SUFFIX: &str = "tmp";
