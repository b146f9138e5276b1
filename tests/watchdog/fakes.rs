//! Scripted status source and recording alert sink.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use streamwatch::alert::{AlertError, AlertSink};
use streamwatch::http::HttpError;
use streamwatch::status::{Liveness, NotLiveReason, StatusError, StatusSource};

/// Replays a fixed sequence; reports live once exhausted.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<bool, String>>>,
    calls: Arc<Mutex<usize>>,
}

impl ScriptedSource {
    /// Script of plain live / not-live observations.
    pub fn new(observations: &[bool]) -> Self {
        Self::with_results(observations.iter().map(|live| Ok(*live)).collect())
    }

    /// Script where `Err` entries make `fetch` fail.
    pub fn with_results(results: Vec<Result<bool, String>>) -> Self {
        Self {
            script: Mutex::new(results.into()),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Shared count of `fetch` calls.
    pub fn calls(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch(&self) -> Result<Liveness, StatusError> {
        *self.calls.lock().expect("calls lock") += 1;
        let next = self.script.lock().expect("script lock").pop_front();
        match next {
            Some(Ok(true)) | None => Ok(Liveness::Live),
            Some(Ok(false)) => Ok(Liveness::NotLive(NotLiveReason::Status(
                "complete".to_owned(),
            ))),
            Some(Err(msg)) => Err(StatusError::Parse(msg)),
        }
    }
}

/// Records every message; optionally fails each send.
#[derive(Clone, Default)]
pub struct RecordingSink {
    sent: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingSink {
    /// Sink whose every send fails with a 502.
    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            fail: true,
        }
    }

    /// Messages passed to `send` so far.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn send(&self, message: &str) -> Result<(), AlertError> {
        self.sent.lock().expect("sent lock").push(message.to_owned());
        if self.fail {
            return Err(AlertError::Http(HttpError::Status {
                status: 502,
                body: "bad gateway".to_owned(),
            }));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
