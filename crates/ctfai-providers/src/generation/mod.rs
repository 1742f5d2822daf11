//! Generation Adapter Implementations
//!
//! Turn a prompt into raw text using one AI backend.
//!
//! ## Available Adapters
//!
//! | Kind | Adapter | Backend |
//! |------|---------|---------|
//! | `openai` | OpenAIGenerationProvider | Any OpenAI-compatible chat completions API |
//! | `gemini` | GeminiGenerationProvider | Google Generative Language API |
//! | `ollama` | OllamaGenerationProvider | Local Ollama server |
//! | `echo` | EchoGenerationProvider | Offline, deterministic (testing) |
//!
//! Most hosted models (DeepSeek, Qwen, GLM, ERNIE, ...) expose an
//! OpenAI-compatible endpoint and use the `openai` kind with their own
//! endpoint and model.

pub mod echo;
pub mod gemini;
pub mod helpers;
pub mod ollama;
pub mod openai;

pub use echo::{EchoGenerationProvider, EchoMode};
pub use gemini::GeminiGenerationProvider;
pub use helpers::constructor;
pub use ollama::OllamaGenerationProvider;
pub use openai::OpenAIGenerationProvider;
