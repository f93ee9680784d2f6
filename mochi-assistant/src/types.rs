//! Request and result types for the completion client.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions framing the conversation.
    System,
    /// The end user.
    User,
    /// A prior assistant turn.
    Assistant,
}

/// One role-tagged message in a completion prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// A system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// A user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// A prior assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A request to the completion service.
///
/// Immutable once constructed; owned by the calling operation for the
/// duration of one call.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    /// Role-tagged message sequence.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
}

impl CompletionRequest {
    /// Create a system + user chat request with default parameters.
    #[must_use]
    pub fn chat(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: 0.7,
            max_tokens: 512,
            timeout_ms: 10_000,
        }
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the output token limit.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the per-attempt timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Per-attempt timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Outcome of one assistant operation.
///
/// A result is exactly one variant, never partially filled, and has no
/// identity beyond the request/response exchange that produced it.
/// `Failure` is a normal, renderable outcome: its `reason` is user-safe
/// text, never raw upstream error detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionResult {
    /// The upstream produced text.
    Success {
        /// The generated text.
        text: String,
    },
    /// The call could not be served; `reason` is ready to render.
    Failure {
        /// User-presentable explanation.
        reason: String,
    },
}

impl CompletionResult {
    /// Whether this is a `Success`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, CompletionResult::Success { .. })
    }

    /// The generated text, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            CompletionResult::Success { text } => Some(text),
            CompletionResult::Failure { .. } => None,
        }
    }
}
