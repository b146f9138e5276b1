//! Pushover messages API backend.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::http::{check_http_response, HttpError};

use super::{AlertError, AlertSink};

const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Form fields posted to the messages endpoint.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct PushoverMessage<'a> {
    /// Application token.
    pub token: &'a str,
    /// User or group key.
    pub user: &'a str,
    /// Message body.
    pub message: &'a str,
}

/// Sends alerts as Pushover notifications.
pub struct PushoverSink {
    app_token: String,
    user_key: String,
    api_url: String,
    client: reqwest::Client,
}

impl PushoverSink {
    /// Create a sink for the given application and user.
    pub fn new(app_token: String, user_key: String, client: reqwest::Client) -> Self {
        Self {
            app_token,
            user_key,
            api_url: PUSHOVER_API_URL.to_owned(),
            client,
        }
    }

    /// Override the full endpoint URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

#[async_trait]
impl AlertSink for PushoverSink {
    async fn send(&self, message: &str) -> Result<(), AlertError> {
        let form = PushoverMessage {
            token: &self.app_token,
            user: &self.user_key,
            message,
        };
        let response = self
            .client
            .post(&self.api_url)
            .form(&form)
            .send()
            .await
            .map_err(HttpError::from)?;
        check_http_response(response).await?;
        debug!("pushover alert delivered");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "pushover"
    }
}
