//! # mochi-assistant — Resilient Completion Client
//!
//! Obtains generated text from an external completion service for the two
//! assistant-backed features of the platform:
//!
//!   - **Support chat** — answer a user's customer-service message
//!   - **Chapter generation** — continue a serial story by one chapter
//!
//! All completion calls go through this crate, ensuring:
//!   - Input validation before any network attempt
//!   - Bounded retries with exponential backoff
//!   - Per-attempt timeouts
//!   - Graceful degradation to a user-safe fallback message
//!
//! A call either succeeds with text or resolves to a renderable
//! [`CompletionResult::Failure`]; upstream errors are logged for operators
//! and never shown to end users verbatim.

pub mod client;
pub mod error;
pub mod prompt;
pub mod service;
pub mod types;

pub use client::{CompletionClient, RetryPolicy};
pub use error::AssistantError;
pub use service::Assistant;
pub use types::{ChatMessage, CompletionRequest, CompletionResult, Role};
