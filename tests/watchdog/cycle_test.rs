//! `Watchdog::run_cycle` with scripted observations.

use std::time::Duration;

use streamwatch::status::{Liveness, NotLiveReason};
use streamwatch::watchdog::{Action, Threshold, WatchState, Watchdog};

use crate::fakes::{RecordingSink, ScriptedSource};

fn watchdog(source: ScriptedSource, sink: RecordingSink, threshold: u32) -> Watchdog {
    Watchdog::new(
        Box::new(source),
        Box::new(sink),
        Threshold::new(threshold).expect("non-zero"),
        Duration::from_secs(60),
        "stream down".to_owned(),
    )
}

#[tokio::test]
async fn two_failures_send_one_alert_with_configured_message() {
    let sink = RecordingSink::default();
    let mut dog = watchdog(ScriptedSource::new(&[false, false]), sink.clone(), 2);

    let first = dog.run_cycle().await;
    assert_eq!(first.action, Action::Count);
    assert_eq!(first.failures, 1);
    assert_eq!(first.state, WatchState::Counting);
    assert_eq!(first.delivered, None);

    let second = dog.run_cycle().await;
    assert_eq!(second.action, Action::Alert);
    assert_eq!(second.failures, 0);
    assert_eq!(second.state, WatchState::Ok);
    assert_eq!(second.delivered, Some(true));

    assert_eq!(sink.sent(), vec!["stream down".to_owned()]);
    assert_eq!(dog.counter().count(), 0);
}

#[tokio::test]
async fn recovery_between_failures_prevents_alert() {
    let sink = RecordingSink::default();
    let mut dog = watchdog(ScriptedSource::new(&[false, true, false]), sink.clone(), 2);

    for _ in 0..3 {
        dog.run_cycle().await;
    }
    assert!(sink.sent().is_empty());
    assert_eq!(dog.counter().count(), 1);
}

#[tokio::test]
async fn query_errors_count_as_failures() {
    let sink = RecordingSink::default();
    let source = ScriptedSource::with_results(vec![Err("timeout".to_owned()), Ok(false)]);
    let mut dog = watchdog(source, sink.clone(), 2);

    let first = dog.run_cycle().await;
    assert!(matches!(
        first.liveness,
        Liveness::NotLive(NotLiveReason::QueryFailed(_))
    ));
    assert_eq!(first.failures, 1);

    let second = dog.run_cycle().await;
    assert_eq!(second.action, Action::Alert);
    assert_eq!(sink.sent().len(), 1);
}

#[tokio::test]
async fn failed_delivery_is_logged_and_counter_still_resets() {
    let sink = RecordingSink::failing();
    let mut dog = watchdog(ScriptedSource::new(&[false, false, false]), sink.clone(), 1);

    for _ in 0..3 {
        let outcome = dog.run_cycle().await;
        assert_eq!(outcome.action, Action::Alert);
        assert_eq!(outcome.delivered, Some(false));
        assert_eq!(outcome.failures, 0);
    }
    assert_eq!(sink.sent().len(), 3);
}

#[tokio::test]
async fn state_follows_live_and_failed_checks() {
    let sink = RecordingSink::default();
    let mut dog = watchdog(ScriptedSource::new(&[true, false, true]), sink.clone(), 3);

    let states = [
        dog.run_cycle().await.state,
        dog.run_cycle().await.state,
        dog.run_cycle().await.state,
    ];
    assert_eq!(
        states,
        [WatchState::Ok, WatchState::Counting, WatchState::Ok]
    );
    assert_eq!(dog.counter().state(), WatchState::Ok);
    assert!(sink.sent().is_empty());
}
