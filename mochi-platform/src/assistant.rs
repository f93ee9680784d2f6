//! Config wiring and the maintenance-gated support desk.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use secrecy::SecretString;
use tracing::info;

use mochi_assistant::client::{CompletionClient, RetryPolicy};
use mochi_assistant::error::AssistantError;
use mochi_assistant::service::Assistant;
use mochi_assistant::types::CompletionResult;
use mochi_core::config::AssistantConfig;
use mochi_core::maintenance::{GateStatus, MaintenanceWindow};
use mochi_core::metrics::PlatformCounters;

/// User-safe text returned while the maintenance window is closed.
pub const MAINTENANCE_MESSAGE: &str =
    "The assistant is offline for scheduled maintenance. Please check back soon.";

/// Build the assistant from config.
///
/// The bearer credential is read from the server-side environment variable
/// named by `api_key_env`; it never appears in config files or code.
///
/// # Errors
///
/// Returns `AssistantError::Config` when the credential variable is unset
/// or empty.
pub fn build_assistant(config: &AssistantConfig) -> Result<Assistant, AssistantError> {
    let api_key = std::env::var(&config.api_key_env)
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| {
            AssistantError::Config(format!(
                "completion credential not found in ${}",
                config.api_key_env
            ))
        })?;

    let policy = RetryPolicy::default()
        .with_max_attempts(config.max_attempts)
        .with_base_delay(Duration::from_millis(config.base_delay_ms))
        .with_max_delay(Duration::from_millis(config.max_delay_ms));

    info!(
        base_url = %config.base_url,
        model = %config.model,
        max_attempts = config.max_attempts,
        "assistant configured"
    );

    let client = CompletionClient::new(&config.base_url, api_key, &config.model, policy);
    let mut assistant = Assistant::new(client).with_timeout_ms(config.timeout_ms);
    if let Some(temperature) = config.temperature {
        assistant = assistant.with_temperature(temperature);
    }
    if let Some(max_tokens) = config.max_tokens {
        assistant = assistant.with_max_tokens(max_tokens);
    }
    Ok(assistant)
}

/// Handler-facing assistant operations, gated by the maintenance window.
///
/// A closed gate is a renderable [`CompletionResult::Failure`], not an
/// error; the caller shows it like any other assistant reply.
pub struct SupportDesk {
    assistant: Assistant,
    window: Option<MaintenanceWindow>,
    counters: Arc<PlatformCounters>,
}

impl SupportDesk {
    /// Create a support desk. `window` of `None` disables gating.
    #[must_use]
    pub fn new(
        assistant: Assistant,
        window: Option<MaintenanceWindow>,
        counters: Arc<PlatformCounters>,
    ) -> Self {
        Self {
            assistant,
            window,
            counters,
        }
    }

    /// Answer a support chat message.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty message. Gate closure and upstream
    /// failures resolve to renderable `Failure` results.
    pub async fn chat(&self, message: &str) -> Result<CompletionResult, AssistantError> {
        self.counters.chat_requests.fetch_add(1, Ordering::Relaxed);
        if let Some(failure) = self.gate_failure() {
            return Ok(failure);
        }

        let result = self.assistant.send_chat_prompt(message).await?;
        if !result.is_success() {
            self.counters.assistant_fallbacks.fetch_add(1, Ordering::Relaxed);
        }
        Ok(result)
    }

    /// Request the next chapter of a serial.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for chapter number 0. Gate closure and upstream
    /// failures resolve to renderable `Failure` results.
    pub async fn request_chapter(
        &self,
        chapter_number: u32,
        previous_excerpt: Option<&str>,
    ) -> Result<CompletionResult, AssistantError> {
        self.counters.chapter_requests.fetch_add(1, Ordering::Relaxed);
        if let Some(failure) = self.gate_failure() {
            return Ok(failure);
        }

        let result = self
            .assistant
            .generate_chapter(chapter_number, previous_excerpt)
            .await?;
        if !result.is_success() {
            self.counters.assistant_fallbacks.fetch_add(1, Ordering::Relaxed);
        }
        Ok(result)
    }

    // A closed window short-circuits before any upstream attempt.
    fn gate_failure(&self) -> Option<CompletionResult> {
        let window = self.window?;
        match window.status(Utc::now()) {
            GateStatus::Open => None,
            GateStatus::Closed { reopens_at_hour } => {
                self.counters.assistant_fallbacks.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(reopens_at_hour, "assistant gated by maintenance window");
                Some(CompletionResult::Failure {
                    reason: MAINTENANCE_MESSAGE.to_string(),
                })
            }
        }
    }
}
