//! Error types for model calls.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when calling the generative model.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Provider returned 429 and retries were exhausted.
    #[error("rate limited by model provider")]
    RateLimited,

    /// Provider rejected the request outright (400/401/403). Never retried.
    #[error("invalid credential or bad request")]
    InvalidCredential,

    /// The request exceeded the hard per-call timeout.
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    /// Output could not be parsed even after one repair attempt.
    #[error("malformed model output: {0}")]
    MalformedOutput(String),

    /// Network-level failure (DNS, connect, TLS, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// Any other provider error carrying the HTTP status.
    #[error("provider error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl LlmError {
    /// Whether the retry loop should attempt this call again.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::RateLimited
            | LlmError::Timeout(_)
            | LlmError::Transport(_) => true,
            LlmError::Api { status, .. } => *status >= 500,
            LlmError::InvalidCredential | LlmError::MalformedOutput(_) => false,
        }
    }
}
