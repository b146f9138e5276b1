//! Console fallback: prints alerts to standard output.

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{AlertError, AlertSink};

/// Writes `ALERT: <message>` lines to a writer (stdout by default).
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Sink writing to standard output.
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    /// Sink writing to an arbitrary writer.
    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

/// Format the console alert line (without trailing newline).
pub fn format_alert_line(message: &str) -> String {
    format!("ALERT: {message}")
}

#[async_trait]
impl AlertSink for ConsoleSink {
    async fn send(&self, message: &str) -> Result<(), AlertError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| std::io::Error::other("console writer lock poisoned"))?;
        writeln!(out, "{}", format_alert_line(message))?;
        out.flush()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
