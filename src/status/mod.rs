//! Broadcast status sources.
//!
//! Defines the [`StatusSource`] trait and the [`Liveness`] observation the
//! watchdog consumes. The fallible query lives in [`StatusSource::fetch`];
//! [`StatusSource::check`] folds every failure into [`Liveness::NotLive`] so
//! the loop never sees an error.

use std::fmt;

use async_trait::async_trait;
use tracing::warn;

use crate::http::HttpError;

pub mod youtube;

/// Outcome of one liveness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Liveness {
    /// The broadcast is reported live.
    Live,
    /// Anything else, with the reason for logging.
    NotLive(NotLiveReason),
}

impl Liveness {
    /// Whether this observation counts as live.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }
}

impl fmt::Display for Liveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => f.write_str("live"),
            Self::NotLive(reason) => write!(f, "not live ({reason})"),
        }
    }
}

/// Why a check did not observe a live broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotLiveReason {
    /// A broadcast exists but reports another lifecycle status.
    Status(String),
    /// The API returned no active broadcast.
    NoActiveBroadcast,
    /// The query itself failed.
    QueryFailed(String),
}

impl fmt::Display for NotLiveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "lifecycle status {status:?}"),
            Self::NoActiveBroadcast => f.write_str("no active broadcast"),
            Self::QueryFailed(err) => write!(f, "query failed: {err}"),
        }
    }
}

/// Errors from a status query.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    /// Transport failure or non-success HTTP status.
    #[error("status query failed: {0}")]
    Http(#[from] HttpError),
    /// Response did not match the expected schema.
    #[error("status response parse error: {0}")]
    Parse(String),
}

/// Answers "is the target live?".
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Perform one query. No retries.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError`] on transport, status, or parse failure.
    async fn fetch(&self) -> Result<Liveness, StatusError>;

    /// Perform one query, treating any failure as not live.
    async fn check(&self) -> Liveness {
        match self.fetch().await {
            Ok(liveness) => liveness,
            Err(e) => {
                warn!(error = %e, "liveness query failed");
                Liveness::NotLive(NotLiveReason::QueryFailed(e.to_string()))
            }
        }
    }
}
