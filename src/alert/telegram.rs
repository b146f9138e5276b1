//! Telegram Bot API backend.
//!
//! Uses teloxide `Bot` directly (send-only, no dispatcher). The chat id is
//! passed through as configured: numeric ids as integers, `@channel`
//! usernames as strings.

use std::time::Duration;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use tracing::debug;

use crate::config::ChatId as ConfiguredChatId;
use crate::http::sanitize_error_text;

use super::{AlertError, AlertSink};

/// Sends alerts to one Telegram chat.
pub struct TelegramSink {
    bot: Bot,
    chat_id: ConfiguredChatId,
}

impl TelegramSink {
    /// Create a sink for the given bot and chat with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        bot_token: &str,
        chat_id: ConfiguredChatId,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build Telegram client: {e}"))?;
        Ok(Self {
            bot: Bot::with_client(bot_token, client),
            chat_id,
        })
    }

    /// Override the Bot API base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: reqwest::Url) -> Self {
        self.bot = self.bot.set_api_url(api_url);
        self
    }
}

/// Map the configured chat id onto a teloxide recipient.
pub fn recipient(chat_id: &ConfiguredChatId) -> Recipient {
    match chat_id {
        ConfiguredChatId::Id(id) => Recipient::Id(ChatId(*id)),
        ConfiguredChatId::Name(name) => Recipient::ChannelUsername(name.clone()),
    }
}

#[async_trait]
impl AlertSink for TelegramSink {
    async fn send(&self, message: &str) -> Result<(), AlertError> {
        self.bot
            .send_message(recipient(&self.chat_id), message)
            .await
            .map_err(|e| AlertError::Telegram(sanitize_error_text(&e.to_string())))?;
        debug!(chat_id = %self.chat_id, "telegram alert delivered");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
