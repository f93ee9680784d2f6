//! Configuration for the Mochi platform services.
//!
//! Maps directly to `mochi.toml`. Every section and field has a default so
//! a missing file or partial file still yields a usable configuration.

use serde::{Deserialize, Serialize};

/// Top-level platform configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[derive(Default)]
pub struct MochiConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Completion-assistant integration settings.
    #[serde(default)]
    pub assistant: AssistantConfig,
    /// Daily maintenance window.
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
    /// Wallet reward tuning.
    #[serde(default)]
    pub wallet: WalletConfig,
    /// Session lifetime settings.
    #[serde(default)]
    pub session: SessionConfig,
}

impl MochiConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `CoreError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::CoreError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Whether platform services are enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
        }
    }
}

/// Completion-assistant integration settings.
///
/// The bearer credential itself never appears here; `api_key_env` names the
/// server-side environment variable it is read from at wiring time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Base URL of the upstream completion service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier sent with each request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Total attempts per invocation (first try + retries).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds; attempt n waits `base * 2^n`.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound on a single backoff delay in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Per-attempt request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Sampling temperature. Unset means each prompt's own value applies.
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Output token limit. Unset means each prompt's own value applies.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Name of the environment variable holding the bearer credential.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            timeout_ms: default_timeout_ms(),
            temperature: None,
            max_tokens: None,
            api_key_env: default_api_key_env(),
        }
    }
}

/// Daily maintenance window in UTC hours, half-open `[start, end)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceConfig {
    /// Whether the window is enforced at all.
    #[serde(default)]
    pub enabled: bool,
    /// Hour of day (UTC) the window opens.
    #[serde(default = "default_maintenance_start")]
    pub start_hour: u32,
    /// Hour of day (UTC) the window closes.
    #[serde(default = "default_maintenance_end")]
    pub end_hour: u32,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            start_hour: default_maintenance_start(),
            end_hour: default_maintenance_end(),
        }
    }
}

/// Wallet reward tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Points credited by a daily check-in.
    #[serde(default = "default_check_in_points")]
    pub check_in_points: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            check_in_points: default_check_in_points(),
        }
    }
}

/// Session lifetime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long a session stays valid, in minutes.
    #[serde(default = "default_session_ttl")]
    pub ttl_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_session_ttl(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    300
}

fn default_max_delay_ms() -> u64 {
    5_000
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_api_key_env() -> String {
    "MOCHI_ASSISTANT_API_KEY".to_string()
}

fn default_maintenance_start() -> u32 {
    3
}

fn default_maintenance_end() -> u32 {
    5
}

fn default_check_in_points() -> u64 {
    50
}

fn default_session_ttl() -> u64 {
    720
}
