//! Error types for the email triage service.

use std::time::Duration;

/// Top-level error type, used on the startup path.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The request never produced an HTTP response (connect, TLS, timeout).
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    /// The provider answered with a non-success status.
    #[error("Provider {provider} returned {status}: {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Whether the provider itself rejected the call, as opposed to the call
    /// failing on our side of the wire or returning something unusable.
    pub fn is_provider_error(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::RateLimited { .. })
    }
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_are_api_and_rate_limit_only() {
        let api = LlmError::Api {
            provider: "gemini".into(),
            status: 400,
            message: "API key not valid".into(),
        };
        let limited = LlmError::RateLimited {
            provider: "gemini".into(),
            retry_after: None,
        };
        let transport = LlmError::RequestFailed {
            provider: "gemini".into(),
            reason: "connection refused".into(),
        };
        let invalid = LlmError::InvalidResponse {
            provider: "gemini".into(),
            reason: "no text".into(),
        };

        assert!(api.is_provider_error());
        assert!(limited.is_provider_error());
        assert!(!transport.is_provider_error());
        assert!(!invalid.is_provider_error());
    }

    #[test]
    fn api_error_display_includes_status() {
        let err = LlmError::Api {
            provider: "gemini".into(),
            status: 403,
            message: "permission denied".into(),
        };
        assert_eq!(
            err.to_string(),
            "Provider gemini returned 403: permission denied"
        );
    }
}
