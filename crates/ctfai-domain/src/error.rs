//! Error handling types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the orchestration service
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (simple form)
    #[error("I/O error: {source}")]
    IoSimple {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// I/O operation error (with context)
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Request shape or range violation, rejected before any provider call
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What was wrong with the request
        message: String,
    },

    /// Provider configuration rejected by the registry
    #[error("Invalid provider configuration: {message}")]
    InvalidConfig {
        /// What was wrong with the configuration
        message: String,
    },

    /// No provider could be resolved for the call
    #[error("No provider available: {message}")]
    NoProviderAvailable {
        /// Why resolution failed
        message: String,
    },

    /// An explicitly named provider is disabled
    #[error("Provider '{name}' is disabled")]
    ProviderDisabled {
        /// Name of the disabled provider
        name: String,
    },

    /// Provider call exceeded its deadline
    #[error("Provider call timed out after {timeout_ms} ms")]
    Timeout {
        /// The deadline that was exceeded
        timeout_ms: u64,
    },

    /// Provider returned output that could not be normalized
    #[error("Malformed provider response: {message}")]
    MalformedResponse {
        /// Description of the problem
        message: String,
    },

    /// Caller is not allowed to perform the operation
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Description of the denied operation
        message: String,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Adapter-specific failure (authentication, rate limit, transport, ...)
    #[error("Provider error: {message}")]
    Provider {
        /// Description of the provider failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Call abandoned because its caller went away
    #[error("Call cancelled: {message}")]
    Cancelled {
        /// Description of the cancellation
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

/// User-visible error category
///
/// Serialized by name (`"Timeout"`, `"ProviderDisabled"`, ...) in HTTP
/// bodies and in comparison report entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Bad input shape or range
    InvalidRequest,
    /// Rejected provider configuration
    InvalidConfig,
    /// Resolution failure
    NoProviderAvailable,
    /// Explicitly named provider is disabled
    ProviderDisabled,
    /// Deadline exceeded
    Timeout,
    /// Unusable provider output
    MalformedResponse,
    /// Authorization failure
    Forbidden,
    /// Unknown resource
    NotFound,
    /// Adapter-specific failure
    ProviderError,
    /// Caller went away before completion
    Cancelled,
    /// Anything else
    Internal,
}

impl ErrorKind {
    /// Stable name used on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "InvalidRequest",
            Self::InvalidConfig => "InvalidConfig",
            Self::NoProviderAvailable => "NoProviderAvailable",
            Self::ProviderDisabled => "ProviderDisabled",
            Self::Timeout => "Timeout",
            Self::MalformedResponse => "MalformedResponse",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "NotFound",
            Self::ProviderError => "ProviderError",
            Self::Cancelled => "Cancelled",
            Self::Internal => "Internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            Self::NoProviderAvailable { .. } => ErrorKind::NoProviderAvailable,
            Self::ProviderDisabled { .. } => ErrorKind::ProviderDisabled,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Provider { .. } => ErrorKind::ProviderError,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
            Self::IoSimple { .. }
            | Self::Io { .. }
            | Self::Json { .. }
            | Self::Configuration { .. }
            | Self::Internal { .. } => ErrorKind::Internal,
        }
    }
}

// Request and resolution error creation methods
impl Error {
    /// Create an invalid request error
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an invalid provider configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a resolution failure
    pub fn no_provider_available<S: Into<String>>(message: S) -> Self {
        Self::NoProviderAvailable {
            message: message.into(),
        }
    }

    /// Create a disabled provider error
    pub fn provider_disabled<S: Into<String>>(name: S) -> Self {
        Self::ProviderDisabled { name: name.into() }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }
}

// Provider call error creation methods
impl Error {
    /// Create a timeout error
    pub fn timeout(timeout_ms: u64) -> Self {
        Self::Timeout { timeout_ms }
    }

    /// Create a malformed response error
    pub fn malformed_response<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create an adapter failure
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Create an adapter failure with source
    pub fn provider_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Provider {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a cancellation error
    pub fn cancelled<S: Into<String>>(message: S) -> Self {
        Self::Cancelled {
            message: message.into(),
        }
    }
}

// Infrastructure error creation methods
impl Error {
    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
