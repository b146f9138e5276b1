//! Alert delivery backends.
//!
//! Defines the [`AlertSink`] trait with one implementation per backend:
//! - [`telegram::TelegramSink`] — Bot API `sendMessage`
//! - [`pushover::PushoverSink`] — Pushover messages API
//! - [`console::ConsoleSink`] — standard output
//!
//! [`build_sink`] picks the backend once, from the configured method.

use async_trait::async_trait;

use crate::config::{AlertMethod, WatchdogConfig};
use crate::http::HttpError;

pub mod console;
pub mod pushover;
pub mod telegram;

/// Errors returned by alert backends.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    /// HTTP delivery failed.
    #[error("alert delivery failed: {0}")]
    Http(#[from] HttpError),
    /// The Telegram Bot API rejected the message or was unreachable.
    /// The text is sanitized and never contains the bot token.
    #[error("telegram delivery failed: {0}")]
    Telegram(String),
    /// Writing to the console failed.
    #[error("console write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Delivers an alert message to a human.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Send one message. No retries and no delivery confirmation beyond
    /// the call succeeding.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError`] when the backend call fails.
    async fn send(&self, message: &str) -> Result<(), AlertError>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}

/// Build the sink for the configured alert method.
///
/// # Errors
///
/// Returns an error if the selected backend's credentials are missing.
pub fn build_sink(
    config: &WatchdogConfig,
    client: reqwest::Client,
) -> anyhow::Result<Box<dyn AlertSink>> {
    let sink: Box<dyn AlertSink> = match config.alert_method {
        AlertMethod::Telegram => {
            let token = config
                .telegram_bot_token
                .clone()
                .ok_or_else(|| anyhow::anyhow!("telegram_bot_token is not configured"))?;
            let chat_id = config
                .telegram_chat_id
                .clone()
                .ok_or_else(|| anyhow::anyhow!("telegram_chat_id is not configured"))?;
            Box::new(telegram::TelegramSink::new(
                &token,
                chat_id,
                config.http_timeout(),
            )?)
        }
        AlertMethod::Pushover => {
            let app_token = config
                .pushover_app_token
                .clone()
                .ok_or_else(|| anyhow::anyhow!("pushover_app_token is not configured"))?;
            let user_key = config
                .pushover_user_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("pushover_user_key is not configured"))?;
            Box::new(pushover::PushoverSink::new(app_token, user_key, client))
        }
        AlertMethod::Console => Box::new(console::ConsoleSink::stdout()),
    };
    Ok(sink)
}
