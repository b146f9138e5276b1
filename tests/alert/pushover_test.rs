//! Pushover form payload and error handling.

use std::time::Duration;

use streamwatch::alert::pushover::PushoverSink;
use streamwatch::alert::{AlertError, AlertSink};
use streamwatch::http::build_client;

use crate::http_support::serve_once;

fn client() -> reqwest::Client {
    build_client(Duration::from_secs(5)).expect("client should build")
}

fn form_fields(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}

#[tokio::test]
async fn posts_token_user_and_message_as_form() {
    let (base, captured) = serve_once("200 OK", r#"{"status":1,"request":"abc"}"#).await;
    let sink = PushoverSink::new("app-token".to_owned(), "user-key".to_owned(), client())
        .with_api_url(format!("{base}/1/messages.json"));

    sink.send("stream down").await.expect("send should succeed");

    let request = captured.await.expect("request should be captured");
    assert_eq!(request.method(), "POST");
    assert_eq!(request.target(), "/1/messages.json");
    assert_eq!(
        request.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(
        form_fields(&request.body),
        vec![
            ("token".to_owned(), "app-token".to_owned()),
            ("user".to_owned(), "user-key".to_owned()),
            ("message".to_owned(), "stream+down".to_owned()),
        ]
    );
}

#[tokio::test]
async fn error_status_is_an_alert_error() {
    let (base, _captured) = serve_once(
        "400 Bad Request",
        r#"{"user":"invalid","errors":["user identifier is invalid"],"status":0}"#,
    )
    .await;
    let sink = PushoverSink::new("app-token".to_owned(), "bad".to_owned(), client())
        .with_api_url(format!("{base}/1/messages.json"));

    let err = sink.send("x").await.expect_err("400 should fail");
    assert!(matches!(err, AlertError::Http(_)));
    assert!(err.to_string().contains("400"));
}
