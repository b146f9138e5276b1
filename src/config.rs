//! Configuration loading and validation.
//!
//! The watchdog reads a single flat record once at startup. Keys are shared
//! between the JSON and TOML encodings; the format is chosen from the file
//! extension. Optional keys use `#[serde(default)]` so only the API key and
//! the selected backend's credentials are required.

use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Fixed location the watchdog reads its configuration from.
pub const DEFAULT_CONFIG_PATH: &str = "/usr/local/youtube-watchdog/config.json";

/// Text sent when the failure threshold is reached.
pub const DEFAULT_ALERT_MESSAGE: &str = "\u{26a0}\u{fe0f} YouTube stream is NOT LIVE";

/// Top-level watchdog configuration.
#[derive(Clone, Deserialize)]
pub struct WatchdogConfig {
    /// YouTube Data API key.
    pub youtube_api_key: String,

    /// Optional OAuth access token sent as a bearer credential.
    #[serde(default)]
    pub youtube_access_token: Option<String>,

    /// Seconds to sleep between liveness checks.
    #[serde(default = "default_poll_interval_sec")]
    pub poll_interval_sec: u64,

    /// Consecutive negative checks that trigger an alert.
    #[serde(default = "default_consecutive_failures")]
    pub consecutive_failures: u32,

    /// Which backend delivers alerts.
    #[serde(default)]
    pub alert_method: AlertMethod,

    /// Telegram bot token (`telegram` method).
    #[serde(default)]
    pub telegram_bot_token: Option<String>,

    /// Telegram chat receiving alerts (`telegram` method).
    #[serde(default)]
    pub telegram_chat_id: Option<ChatId>,

    /// Pushover application token (`pushover` method).
    #[serde(default)]
    pub pushover_app_token: Option<String>,

    /// Pushover user or group key (`pushover` method).
    #[serde(default)]
    pub pushover_user_key: Option<String>,

    /// Alert text.
    #[serde(default = "default_alert_message")]
    pub alert_message: String,

    /// Timeout applied to every outbound HTTP call, in seconds.
    #[serde(default = "default_http_timeout_sec")]
    pub http_timeout_sec: u64,

    /// Directory for rotated JSON log files. Console-only when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

/// Supported alert delivery backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertMethod {
    /// Telegram Bot API `sendMessage`.
    #[default]
    Telegram,
    /// Pushover push notification.
    Pushover,
    /// Print to standard output.
    Console,
}

impl fmt::Display for AlertMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Telegram => "telegram",
            Self::Pushover => "pushover",
            Self::Console => "console",
        };
        f.write_str(name)
    }
}

/// Telegram chat identifier: numeric id or `@channelusername`.
///
/// Serialized back in the same JSON type it was configured with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    /// Numeric chat id.
    Id(i64),
    /// Public channel username or id given as a string.
    Name(String),
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl fmt::Debug for WatchdogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchdogConfig")
            .field("youtube_api_key", &"[REDACTED]")
            .field(
                "youtube_access_token",
                &self.youtube_access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("poll_interval_sec", &self.poll_interval_sec)
            .field("consecutive_failures", &self.consecutive_failures)
            .field("alert_method", &self.alert_method)
            .field(
                "telegram_bot_token",
                &self.telegram_bot_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field(
                "pushover_app_token",
                &self.pushover_app_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "pushover_user_key",
                &self.pushover_user_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("alert_message", &self.alert_message)
            .field("http_timeout_sec", &self.http_timeout_sec)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

impl WatchdogConfig {
    /// Validate that required fields are present and values are in range.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending key.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.youtube_api_key.trim().is_empty(),
            "youtube_api_key must not be empty"
        );
        anyhow::ensure!(self.poll_interval_sec >= 1, "poll_interval_sec must be >= 1");
        anyhow::ensure!(
            self.consecutive_failures >= 1,
            "consecutive_failures must be >= 1"
        );
        anyhow::ensure!(self.http_timeout_sec >= 1, "http_timeout_sec must be >= 1");

        match self.alert_method {
            AlertMethod::Telegram => {
                require_present(self.telegram_bot_token.as_deref(), "telegram_bot_token")?;
                match &self.telegram_chat_id {
                    None => {
                        anyhow::bail!("telegram_chat_id is required for alert_method 'telegram'")
                    }
                    Some(ChatId::Name(name)) => anyhow::ensure!(
                        !name.trim().is_empty(),
                        "telegram_chat_id must not be empty"
                    ),
                    Some(ChatId::Id(_)) => {}
                }
            }
            AlertMethod::Pushover => {
                require_present(self.pushover_app_token.as_deref(), "pushover_app_token")?;
                require_present(self.pushover_user_key.as_deref(), "pushover_user_key")?;
            }
            AlertMethod::Console => {}
        }
        Ok(())
    }

    /// Sleep between cycles.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_sec)
    }

    /// Per-request HTTP timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_sec)
    }

    /// Failure threshold as a non-zero count.
    ///
    /// # Errors
    ///
    /// Returns an error if `consecutive_failures` is zero.
    pub fn threshold(&self) -> anyhow::Result<NonZeroU32> {
        NonZeroU32::new(self.consecutive_failures)
            .ok_or_else(|| anyhow::anyhow!("consecutive_failures must be >= 1"))
    }
}

fn require_present(value: Option<&str>, key: &str) -> anyhow::Result<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => anyhow::bail!("{key} is required for the configured alert_method"),
    }
}

/// Parse a configuration document. `json` selects the JSON decoder,
/// otherwise TOML is used.
///
/// # Errors
///
/// Returns an error if the document does not parse or fails validation.
pub fn parse_config(contents: &str, json: bool) -> anyhow::Result<WatchdogConfig> {
    let config: WatchdogConfig = if json {
        serde_json::from_str(contents).context("invalid JSON configuration")?
    } else {
        toml::from_str(contents).context("invalid TOML configuration")?
    };
    config.validate()?;
    Ok(config)
}

/// Load the watchdog configuration from a file.
///
/// Files ending in `.json` are parsed as JSON, everything else as TOML.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
pub fn load_config(path: &Path) -> anyhow::Result<WatchdogConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    parse_config(&contents, json)
        .with_context(|| format!("failed to load config at {}", path.display()))
}

// Default value functions for serde.

fn default_poll_interval_sec() -> u64 {
    60
}

fn default_consecutive_failures() -> u32 {
    2
}

fn default_alert_message() -> String {
    DEFAULT_ALERT_MESSAGE.to_owned()
}

fn default_http_timeout_sec() -> u64 {
    10
}
