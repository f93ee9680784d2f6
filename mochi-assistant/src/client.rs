//! HTTP client for the upstream completion service.
//!
//! One network round trip per attempt, exponential backoff between failed
//! attempts, and a hard stop on the first 2xx reply: a well-formed body
//! ends the call with text, a malformed or empty body is a final failure.
//! Only transport errors and non-2xx statuses are retried; retrying a
//! malformed 2xx body risks looping on a service that is "up" but broken.

use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, warn};

use crate::error::AssistantError;
use crate::types::CompletionRequest;

/// Backoff schedule for failed attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per invocation (first try + retries).
    pub max_attempts: u32,
    /// Base delay; after n failed attempts the next try waits `base * 2^n`.
    pub base_delay: Duration,
    /// Upper bound on a single delay.
    pub max_delay: Duration,
    /// Whether to add jitter to each delay.
    pub use_jitter: bool,
    /// Additive jitter as a fraction of the delay, clamped to 0.0..=0.1 so
    /// the schedule stays monotonic under the doubling.
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(300),
            max_delay: Duration::from_secs(5),
            use_jitter: false,
            jitter_factor: 0.1,
        }
    }
}

impl RetryPolicy {
    /// Set the total attempt budget. Clamped to at least 1.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the base delay.
    #[must_use]
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Set the delay cap.
    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Enable jitter with the given fraction (clamped to 0.0..=0.1).
    #[must_use]
    pub fn with_jitter(mut self, jitter_factor: f64) -> Self {
        self.use_jitter = true;
        self.jitter_factor = jitter_factor.clamp(0.0, 0.1);
        self
    }

    /// Delay before the next attempt, after `failed_attempts` failures.
    #[must_use]
    pub fn delay_for(&self, failed_attempts: u32) -> Duration {
        let factor = 1u64 << failed_attempts.min(16);
        let millis = (self.base_delay.as_millis() as u64).saturating_mul(factor);
        let delay = Duration::from_millis(millis).min(self.max_delay);
        if self.use_jitter {
            self.add_jitter(delay)
        } else {
            delay
        }
    }

    // Jitter is additive-only: [delay, delay * (1 + factor)].
    fn add_jitter(&self, delay: Duration) -> Duration {
        let factor = self.jitter_factor.clamp(0.0, 0.1);
        let jitter_range = delay.as_millis() as f64 * factor;
        let jitter = rand::thread_rng().gen_range(0.0..=jitter_range);
        delay + Duration::from_millis(jitter as u64)
    }
}

/// Client for the upstream completion service.
///
/// Performs no local mutation: each invocation owns its own attempt
/// counter, and identical calls issue independent upstream requests.
pub struct CompletionClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
    policy: RetryPolicy,
}

impl CompletionClient {
    /// Create a new client. The credential comes from a server-side secret
    /// source; it is never logged or serialized.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        api_key: SecretString,
        model: impl Into<String>,
        policy: RetryPolicy,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
            policy,
        }
    }

    /// The retry policy in force.
    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Obtain generated text for a request.
    ///
    /// Retries transport errors and non-2xx statuses up to the policy's
    /// attempt budget, waiting `base * 2^n` between tries. The first 2xx
    /// reply is terminal either way: text ends the call, a malformed or
    /// empty body fails it without further attempts.
    ///
    /// # Errors
    ///
    /// `MalformedResponse`/`EmptyCompletion` for a bad 2xx body, otherwise
    /// `RetriesExhausted` carrying the last underlying error.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String, AssistantError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": &request.messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        let mut last_error = String::new();
        for attempt in 0..self.policy.max_attempts {
            if attempt > 0 {
                let delay = self.policy.delay_for(attempt);
                debug!(
                    attempt = attempt + 1,
                    total = self.policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "retrying completion call"
                );
                tokio::time::sleep(delay).await;
            }

            let result = self
                .http
                .post(&url)
                .bearer_auth(self.api_key.expose_secret())
                .json(&body)
                .timeout(request.timeout())
                .send()
                .await;

            match result {
                Ok(resp) if resp.status().is_success() => {
                    let json: serde_json::Value = resp
                        .json()
                        .await
                        .map_err(|e| AssistantError::MalformedResponse(e.to_string()))?;

                    let text = json["choices"][0]["message"]["content"]
                        .as_str()
                        .unwrap_or("");
                    if text.is_empty() {
                        return Err(AssistantError::EmptyCompletion);
                    }
                    return Ok(text.to_string());
                }
                Ok(resp) => {
                    last_error = format!("HTTP {}", resp.status());
                    warn!(
                        status = %resp.status(),
                        attempt = attempt + 1,
                        "completion service returned error status"
                    );
                }
                Err(e) => {
                    // Classify the transport error; the conversion leaves
                    // the timeout duration to us.
                    let mut err = AssistantError::from(e);
                    if let AssistantError::Timeout(ms) = &mut err {
                        *ms = request.timeout_ms;
                    }
                    warn!(
                        error = %err,
                        attempt = attempt + 1,
                        "completion attempt failed"
                    );
                    last_error = err.to_string();
                }
            }
        }

        Err(AssistantError::RetriesExhausted {
            attempts: self.policy.max_attempts,
            last_error,
        })
    }
}
