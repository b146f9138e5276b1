//! The watchdog loop and its failure-counting state machine.
//!
//! [`FailureCounter::observe`] is the whole decision: a pure transition from
//! (counter, observation) to (counter, action). [`Watchdog`] owns the counter
//! and wires it to a [`StatusSource`] and an [`AlertSink`]; checks and
//! alerts are strictly sequential.

use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::alert::AlertSink;
use crate::status::{Liveness, StatusSource};

/// Consecutive negative checks needed to fire an alert. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold(NonZeroU32);

impl Threshold {
    /// Returns `None` for zero.
    pub fn new(count: u32) -> Option<Self> {
        NonZeroU32::new(count).map(Self)
    }

    /// The threshold as a plain count.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl From<NonZeroU32> for Threshold {
    fn from(count: NonZeroU32) -> Self {
        Self(count)
    }
}

/// What the loop must do after an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Target is live; counter cleared.
    Reset,
    /// Failure recorded, threshold not reached.
    Count,
    /// Threshold reached: dispatch one alert. Counter already cleared.
    Alert,
}

/// Derived watchdog state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// No outstanding failures.
    Ok,
    /// Some failures, below the threshold.
    Counting,
}

/// Consecutive failure count since the last live check or alert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureCounter {
    consecutive: u32,
}

impl FailureCounter {
    /// Current consecutive failure count.
    pub fn count(self) -> u32 {
        self.consecutive
    }

    /// Derived state.
    pub fn state(self) -> WatchState {
        if self.consecutive == 0 {
            WatchState::Ok
        } else {
            WatchState::Counting
        }
    }

    /// Apply one observation.
    ///
    /// A live observation resets to zero. A negative one increments, unless
    /// that would reach the threshold, in which case the counter resets and
    /// the caller must alert. The returned count is always below the threshold.
    #[must_use]
    pub fn observe(self, liveness: &Liveness, threshold: Threshold) -> (Self, Action) {
        if liveness.is_live() {
            return (Self::default(), Action::Reset);
        }
        let next = self.consecutive.saturating_add(1);
        if next >= threshold.get() {
            (Self::default(), Action::Alert)
        } else {
            (Self { consecutive: next }, Action::Count)
        }
    }
}

/// Result of one watchdog cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    /// What the status source reported.
    pub liveness: Liveness,
    /// Transition taken.
    pub action: Action,
    /// Failure count after the cycle.
    pub failures: u32,
    /// Watchdog state after the cycle.
    pub state: WatchState,
    /// For [`Action::Alert`], whether the backend accepted the alert.
    pub delivered: Option<bool>,
}

/// Polls a status source and alerts after consecutive failures.
pub struct Watchdog {
    source: Box<dyn StatusSource>,
    sink: Box<dyn AlertSink>,
    threshold: Threshold,
    poll_interval: Duration,
    alert_message: String,
    counter: FailureCounter,
}

impl Watchdog {
    /// Create a watchdog in the OK state.
    pub fn new(
        source: Box<dyn StatusSource>,
        sink: Box<dyn AlertSink>,
        threshold: Threshold,
        poll_interval: Duration,
        alert_message: String,
    ) -> Self {
        Self {
            source,
            sink,
            threshold,
            poll_interval,
            alert_message,
            counter: FailureCounter::default(),
        }
    }

    /// Current failure counter.
    pub fn counter(&self) -> FailureCounter {
        self.counter
    }

    /// Run one check, apply the transition, and alert if required.
    ///
    /// Alert delivery failures are logged and otherwise ignored.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let liveness = self.source.check().await;
        let previous = self.counter;
        let (next, action) = previous.observe(&liveness, self.threshold);
        self.counter = next;

        let delivered = match action {
            Action::Reset => {
                if previous.state() == WatchState::Counting {
                    info!(
                        previous_failures = previous.count(),
                        state = ?next.state(),
                        "broadcast live again"
                    );
                } else {
                    debug!(state = ?next.state(), "broadcast live");
                }
                None
            }
            Action::Count => {
                warn!(
                    failures = next.count(),
                    threshold = self.threshold.get(),
                    state = ?next.state(),
                    %liveness,
                    "broadcast not live"
                );
                None
            }
            Action::Alert => {
                warn!(
                    threshold = self.threshold.get(),
                    %liveness,
                    backend = self.sink.name(),
                    "failure threshold reached, sending alert"
                );
                match self.sink.send(&self.alert_message).await {
                    Ok(()) => {
                        info!(backend = self.sink.name(), "alert sent");
                        Some(true)
                    }
                    Err(e) => {
                        warn!(backend = self.sink.name(), error = %e, "failed to send alert");
                        Some(false)
                    }
                }
            }
        };

        CycleOutcome {
            liveness,
            action,
            failures: next.count(),
            state: next.state(),
            delivered,
        }
    }

    /// Run cycles forever, sleeping `poll_interval` after each one, until
    /// `shutdown` resolves. Shutdown is only observed while sleeping.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(
            threshold = self.threshold.get(),
            poll_interval_secs = self.poll_interval.as_secs(),
            backend = self.sink.name(),
            "watchdog started"
        );
        loop {
            self.run_cycle().await;
            tokio::select! {
                () = tokio::time::sleep(self.poll_interval) => {}
                () = &mut shutdown => {
                    info!("received shutdown signal, stopping watchdog");
                    break;
                }
            }
        }
    }

    /// Run until Ctrl-C.
    pub async fn run(&mut self) {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await;
    }
}
