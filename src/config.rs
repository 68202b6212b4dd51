//! Configuration
//!
//! Environment-resolved application configuration, read once at startup and
//! passed by reference afterwards. Nothing mutates it at runtime.

use thiserror::Error;
use url::Url;

/// Base URL used when CONTROL_API_URL is not set.
pub const DEFAULT_CONTROL_API_URL: &str = "http://localhost:3000";

/// Immutable process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Telegram bot token (required).
    pub telegram_bot_token: String,
    /// Control API base URL, scheme-validated, no trailing slash.
    pub control_api_url: String,
    /// Optional bearer credential; absence sends unauthenticated calls.
    pub control_api_key: Option<String>,
    /// Chats allowed to drive the bot; empty allows all.
    pub allowed_chat_ids: Vec<i64>,
}

/// Configuration errors surfaced at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {message}")]
    InvalidVar { var: &'static str, message: String },
}

impl AppConfig {
    /// Resolve configuration from the process environment.
    ///
    /// Environment variables:
    /// - `TELEGRAM_BOT_TOKEN` (required)
    /// - `CONTROL_API_URL` (default `http://localhost:3000`)
    /// - `CONTROL_API_KEY` (optional)
    /// - `TELEGRAM_ALLOWED_CHAT_IDS` (optional, comma-separated)
    pub fn from_env() -> Result<Self, ConfigError> {
        let telegram_bot_token =
            non_empty_var("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::MissingVar("TELEGRAM_BOT_TOKEN"))?;
        let control_api_url = normalize_base_url(
            &non_empty_var("CONTROL_API_URL").unwrap_or_else(|| DEFAULT_CONTROL_API_URL.to_string()),
        )?;
        let control_api_key = non_empty_var("CONTROL_API_KEY");
        let allowed_chat_ids =
            parse_chat_ids(&non_empty_var("TELEGRAM_ALLOWED_CHAT_IDS").unwrap_or_default())?;

        Ok(Self {
            telegram_bot_token,
            control_api_url,
            control_api_key,
            allowed_chat_ids,
        })
    }
}

/// Reads a variable, treating empty values as unset.
fn non_empty_var(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.is_empty())
}

/// Validates the base URL and strips any trailing slash so endpoint paths
/// concatenate cleanly.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidVar {
        var: "CONTROL_API_URL",
        message: e.to_string(),
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidVar {
            var: "CONTROL_API_URL",
            message: format!("unsupported scheme: {}", url.scheme()),
        });
    }
    Ok(raw.trim_end_matches('/').to_string())
}

/// Parses a comma-separated chat id list; blank entries are skipped.
pub fn parse_chat_ids(raw: &str) -> Result<Vec<i64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry.parse::<i64>().map_err(|_| ConfigError::InvalidVar {
                var: "TELEGRAM_ALLOWED_CHAT_IDS",
                message: format!("not a chat id: {}", entry),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
