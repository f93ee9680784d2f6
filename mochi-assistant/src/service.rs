//! Caller-facing assistant operations.
//!
//! `Failure` is a normal, renderable outcome: every upstream failure path
//! collapses into the localized fallback string, and the underlying error
//! is logged for operators only. Only caller mistakes (`InvalidInput`,
//! broken wiring) surface as `Err`.

use tracing::warn;

use crate::client::CompletionClient;
use crate::error::AssistantError;
use crate::prompt::{render_template, PromptEngine, PromptId};
use crate::types::{CompletionRequest, CompletionResult};

/// User-safe text returned when the upstream could not be reached.
pub const FALLBACK_MESSAGE: &str =
    "The assistant is temporarily unavailable. Please try again in a moment.";

/// The assistant service: a completion client plus prompt templates.
pub struct Assistant {
    client: CompletionClient,
    prompts: PromptEngine,
    timeout_ms: u64,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl Assistant {
    /// Create an assistant with the built-in prompt templates.
    #[must_use]
    pub fn new(client: CompletionClient) -> Self {
        Self {
            client,
            prompts: PromptEngine::builtin(),
            timeout_ms: 10_000,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Replace the prompt templates (e.g. loaded from a directory).
    #[must_use]
    pub fn with_prompts(mut self, prompts: PromptEngine) -> Self {
        self.prompts = prompts;
        self
    }

    /// Set the per-attempt timeout applied to every request.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Override the sampling temperature for every request, taking
    /// precedence over the per-prompt template values.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Override the output token limit for every request, taking
    /// precedence over the per-prompt template values.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Answer a customer-service chat message.
    ///
    /// Calling this twice with the same message issues two independent
    /// upstream calls; there is no deduplication or caching.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty or whitespace-only message, checked
    /// before any network attempt. Upstream failures are NOT errors: they
    /// resolve to `Ok(Failure { .. })` carrying [`FALLBACK_MESSAGE`].
    pub async fn send_chat_prompt(
        &self,
        message: &str,
    ) -> Result<CompletionResult, AssistantError> {
        if message.trim().is_empty() {
            return Err(AssistantError::InvalidInput(
                "chat message is empty".to_string(),
            ));
        }

        let tpl = self.prompts.get(PromptId::ChatSupport).ok_or_else(|| {
            AssistantError::Config("chat support prompt template not loaded".to_string())
        })?;
        let request = CompletionRequest::chat(tpl.system.clone(), message)
            .with_temperature(self.temperature.unwrap_or(tpl.temperature))
            .with_max_tokens(self.max_tokens.unwrap_or(tpl.max_tokens))
            .with_timeout(self.timeout_ms);

        Ok(self.dispatch(request).await)
    }

    /// Generate the next chapter of a serial.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for chapter number 0, checked before any network
    /// attempt. Upstream failures resolve to `Ok(Failure { .. })`.
    pub async fn generate_chapter(
        &self,
        chapter_number: u32,
        previous_excerpt: Option<&str>,
    ) -> Result<CompletionResult, AssistantError> {
        if chapter_number == 0 {
            return Err(AssistantError::InvalidInput(
                "chapter number must be positive".to_string(),
            ));
        }

        let tpl = self.prompts.get(PromptId::ChapterGeneration).ok_or_else(|| {
            AssistantError::Config("chapter generation prompt template not loaded".to_string())
        })?;
        let chapter = chapter_number.to_string();
        let vars = [
            ("chapter_number", chapter.as_str()),
            ("previous_excerpt", previous_excerpt.unwrap_or("")),
        ];
        let request = CompletionRequest::chat(
            render_template(&tpl.system, &vars),
            render_template(&tpl.user, &vars),
        )
        .with_temperature(self.temperature.unwrap_or(tpl.temperature))
        .with_max_tokens(self.max_tokens.unwrap_or(tpl.max_tokens))
        .with_timeout(self.timeout_ms);

        Ok(self.dispatch(request).await)
    }

    // Operators get the real error in the log; users only ever see the
    // fallback string.
    async fn dispatch(&self, request: CompletionRequest) -> CompletionResult {
        match self.client.complete(&request).await {
            Ok(text) => CompletionResult::Success { text },
            Err(err) => {
                warn!(error = %err, "assistant call failed, returning fallback");
                CompletionResult::Failure {
                    reason: FALLBACK_MESSAGE.to_string(),
                }
            }
        }
    }
}
