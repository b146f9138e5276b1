//! YouTube Data API v3 status source using `liveBroadcasts.list`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::http::check_http_response;

use super::{Liveness, NotLiveReason, StatusError, StatusSource};

const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// `liveBroadcasts.list` response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct LiveBroadcastListResponse {
    /// Matching broadcasts, most relevant first.
    #[serde(default)]
    pub items: Vec<LiveBroadcast>,
}

/// A single broadcast resource (only the `status` part is requested).
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct LiveBroadcast {
    /// Status part.
    pub status: Option<BroadcastStatus>,
}

/// Broadcast status part.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastStatus {
    /// Lifecycle status, e.g. `live`, `testing`, `complete`.
    pub life_cycle_status: Option<String>,
}

/// Interpret a `liveBroadcasts.list` body.
///
/// Only the first returned broadcast is considered.
///
/// # Errors
///
/// Returns [`StatusError::Parse`] if the body is not valid JSON or the first
/// broadcast carries no lifecycle status.
pub fn parse_response(body: &str) -> Result<Liveness, StatusError> {
    let parsed: LiveBroadcastListResponse =
        serde_json::from_str(body).map_err(|e| StatusError::Parse(e.to_string()))?;

    let Some(first) = parsed.items.first() else {
        return Ok(Liveness::NotLive(NotLiveReason::NoActiveBroadcast));
    };

    let status = first
        .status
        .as_ref()
        .and_then(|s| s.life_cycle_status.as_deref())
        .ok_or_else(|| StatusError::Parse("broadcast has no lifeCycleStatus".to_owned()))?;

    if status.eq_ignore_ascii_case("live") {
        Ok(Liveness::Live)
    } else {
        Ok(Liveness::NotLive(NotLiveReason::Status(status.to_owned())))
    }
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Queries the authenticated channel's active broadcast.
#[derive(Clone)]
pub struct YoutubeStatusSource {
    api_key: String,
    access_token: Option<String>,
    api_base: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for YoutubeStatusSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoutubeStatusSource")
            .field("api_base", &self.api_base)
            .field("credentials", &"[REDACTED]")
            .finish()
    }
}

impl YoutubeStatusSource {
    /// Create a source for the given API key.
    pub fn new(api_key: String, access_token: Option<String>, client: reqwest::Client) -> Self {
        Self {
            api_key,
            access_token,
            api_base: YOUTUBE_API_BASE.to_owned(),
            client,
        }
    }

    /// Override the API base URL (no trailing slash).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl StatusSource for YoutubeStatusSource {
    async fn fetch(&self) -> Result<Liveness, StatusError> {
        let url = format!("{}/liveBroadcasts", self.api_base);
        let mut request = self.client.get(&url).query(&[
            ("part", "status"),
            ("broadcastStatus", "active"),
            ("mine", "true"),
            ("key", self.api_key.as_str()),
        ]);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(crate::http::HttpError::from)?;
        let body = check_http_response(response).await?;
        let liveness = parse_response(&body)?;
        debug!(%liveness, "liveness query completed");
        Ok(liveness)
    }
}
