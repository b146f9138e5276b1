//! `StatusSource::check` folds every failure into "not live".

use std::time::Duration;

use async_trait::async_trait;
use streamwatch::http::build_client;
use streamwatch::status::youtube::YoutubeStatusSource;
use streamwatch::status::{Liveness, NotLiveReason, StatusError, StatusSource};

use crate::http_support::{closed_port_url, serve_once};

struct FailingSource;

#[async_trait]
impl StatusSource for FailingSource {
    async fn fetch(&self) -> Result<Liveness, StatusError> {
        Err(StatusError::Parse("unexpected shape".to_owned()))
    }
}

fn client() -> reqwest::Client {
    build_client(Duration::from_secs(5)).expect("client should build")
}

#[tokio::test]
async fn check_turns_errors_into_not_live() {
    let liveness = FailingSource.check().await;
    match liveness {
        Liveness::NotLive(NotLiveReason::QueryFailed(msg)) => {
            assert!(msg.contains("unexpected shape"));
        }
        other => panic!("expected query failure, got {other:?}"),
    }
}

#[tokio::test]
async fn check_on_transport_error_is_not_live() {
    let source =
        YoutubeStatusSource::new("k".to_owned(), None, client()).with_api_base(closed_port_url().await);
    assert!(!source.check().await.is_live());
}

#[tokio::test]
async fn check_on_server_error_is_not_live() {
    let (base, _captured) = serve_once("500 Internal Server Error", "boom").await;
    let source = YoutubeStatusSource::new("k".to_owned(), None, client()).with_api_base(base);
    assert!(matches!(
        source.check().await,
        Liveness::NotLive(NotLiveReason::QueryFailed(_))
    ));
}

#[tokio::test]
async fn check_on_empty_result_is_not_live() {
    let (base, _captured) = serve_once("200 OK", r#"{"items":[]}"#).await;
    let source = YoutubeStatusSource::new("k".to_owned(), None, client()).with_api_base(base);
    assert_eq!(
        source.check().await,
        Liveness::NotLive(NotLiveReason::NoActiveBroadcast)
    );
}

#[test]
fn liveness_display_includes_reason() {
    let text = Liveness::NotLive(NotLiveReason::Status("complete".to_owned())).to_string();
    assert_eq!(text, "not live (lifecycle status \"complete\")");
    assert_eq!(Liveness::Live.to_string(), "live");
}
