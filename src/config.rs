//! Bot configuration from environment variables

use crate::telegram::DEFAULT_API_URL;
use std::time::Duration;
use thiserror::Error;

/// Submission endpoint used in polling mode when `API_URL` is unset
pub const DEFAULT_SUBMISSION_URL: &str = "http://localhost:3000/expenses";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DRAFT_TTL_SECS: u64 = 86_400;

/// Path appended to `WEBHOOK_URL` and served by the webhook router
pub const WEBHOOK_PATH: &str = "/webhook";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// How updates reach the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestionMode {
    Polling,
    Webhook {
        /// Public base URL Telegram pushes to, without the webhook path
        public_url: String,
        port: u16,
        secret: Option<String>,
    },
}

impl IngestionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestionMode::Polling => "polling",
            IngestionMode::Webhook { .. } => "webhook",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub token: String,
    pub mode: IngestionMode,
    /// Expense API endpoint
    pub api_url: String,
    pub telegram_api_url: String,
    /// `None` disables idle draft eviction
    pub draft_ttl: Option<Duration>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token =
            get("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

        let mode_name = get("BOT_MODE").map(|m| m.to_ascii_lowercase());
        let mode = match mode_name.as_deref() {
            None | Some("polling") => IngestionMode::Polling,
            Some("webhook") => IngestionMode::Webhook {
                public_url: get("WEBHOOK_URL")
                    .ok_or(ConfigError::Missing("WEBHOOK_URL"))?
                    .trim_end_matches('/')
                    .to_string(),
                port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
                secret: get("WEBHOOK_SECRET"),
            },
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "BOT_MODE",
                    message: format!("expected 'polling' or 'webhook', got '{other}'"),
                })
            }
        };

        let api_url = match (&mode, get("API_URL")) {
            (_, Some(url)) => url,
            (IngestionMode::Polling, None) => DEFAULT_SUBMISSION_URL.to_string(),
            (IngestionMode::Webhook { .. }, None) => return Err(ConfigError::Missing("API_URL")),
        };

        let telegram_api_url = get("TELEGRAM_API_URL").map_or_else(
            || DEFAULT_API_URL.to_string(),
            |u| u.trim_end_matches('/').to_string(),
        );

        let ttl_secs: u64 = parse_or(
            "DRAFT_TTL_SECS",
            get("DRAFT_TTL_SECS"),
            DEFAULT_DRAFT_TTL_SECS,
        )?;
        let draft_ttl = (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs));

        Ok(Self {
            token,
            mode,
            api_url,
            telegram_api_url,
            draft_ttl,
        })
    }

    /// Full URL registered with `setWebhook`, when in webhook mode
    pub fn webhook_url(&self) -> Option<String> {
        match &self.mode {
            IngestionMode::Webhook { public_url, .. } => {
                Some(format!("{public_url}{WEBHOOK_PATH}"))
            }
            IngestionMode::Polling => None,
        }
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |raw| {
        raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
            key,
            message: format!("'{raw}': {e}"),
        })
    })
}
