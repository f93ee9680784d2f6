//! Assistant error types.

use thiserror::Error;

/// Errors that can occur during assistant operations.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The caller supplied an unusable input. No network attempt is made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP request failed.
    #[error("Completion request failed: {0}")]
    RequestFailed(String),

    /// Request timed out.
    #[error("Completion request timed out after {0}ms")]
    Timeout(u64),

    /// Completion service is unreachable.
    #[error("Completion service unavailable: {0}")]
    Unavailable(String),

    /// A 2xx reply carried a body that was not the expected JSON shape.
    #[error("Failed to parse completion response: {0}")]
    MalformedResponse(String),

    /// A 2xx reply parsed but contained no generated text.
    #[error("Completion response contained no generated text")]
    EmptyCompletion,

    /// All retry attempts exhausted.
    #[error("All completion attempts exhausted after {attempts} tries: {last_error}")]
    RetriesExhausted {
        /// Attempts made before giving up.
        attempts: u32,
        /// Last underlying error, for operator diagnostics.
        last_error: String,
    },

    /// Client wiring error (missing credential, bad template, bad URL).
    #[error("Assistant configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // The per-attempt budget is not known here; the caller fills it in.
            AssistantError::Timeout(0)
        } else if err.is_connect() {
            AssistantError::Unavailable(err.to_string())
        } else {
            AssistantError::RequestFailed(err.to_string())
        }
    }
}
