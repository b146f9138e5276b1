//! HTTP helpers shared by the status source and the alert backends.
//!
//! Every outbound call goes through a single [`reqwest::Client`] built with
//! the configured timeout. Errors that may end up in logs are stripped of
//! request URLs and credential-shaped substrings, since both the YouTube key
//! and the Telegram bot token travel in the URL.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

const MAX_ERROR_BODY_CHARS: usize = 256;

/// Errors from a single HTTP exchange.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Transport failure, timeout, or body read failure.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    /// Upstream responded with a non-success status.
    #[error("non-success status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Sanitized, truncated response body.
        body: String,
    },
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.without_url())
    }
}

/// Build the shared client with a per-request timeout.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, HttpError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("streamwatch/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Check the response status and return the body text or a structured error.
///
/// # Errors
///
/// Returns [`HttpError::Request`] on transport failure and
/// [`HttpError::Status`] on non-2xx responses.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, HttpError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(HttpError::Status {
            status: status.as_u16(),
            body: sanitize_error_text(&body),
        });
    }
    Ok(body)
}

/// Collapse whitespace, redact credential-shaped tokens, and truncate.
pub fn sanitize_error_text(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sanitized = collapsed;
    for regex in secret_patterns() {
        sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
    }

    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}

fn secret_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // Telegram bot token.
            r"\d{6,}:[A-Za-z0-9_\-]{30,}",
            // Google API key.
            r"AIza[0-9A-Za-z_\-]{35}",
            // Google OAuth access token.
            r"ya29\.[0-9A-Za-z._\-]+",
        ]
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
    })
}
