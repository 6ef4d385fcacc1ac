use crate::e2e::helpers;

use helpers::TestContext;
use reqwest::StatusCode;
use voice_relay::infrastructure::config::TtsProvider;

#[tokio::test]
async fn it_should_return_ok_for_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    // Health endpoint returns plain text
    let body = String::from_utf8(response.body_bytes.clone()).unwrap();
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn it_should_report_the_salute_provider_when_ready() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("ready"));
    assert_eq!(
        body.get("tts_provider").and_then(|v| v.as_str()),
        Some("salute")
    );
}

#[tokio::test]
async fn it_should_report_the_mock_provider_for_unknown_names() {
    let ctx = TestContext::with_options(TtsProvider::Unsupported("acme".to_string()), false)
        .await
        .unwrap();

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(
        body.get("tts_provider").and_then(|v| v.as_str()),
        Some("mock")
    );
}

#[tokio::test]
async fn it_should_not_require_allowlist_for_health_checks() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/health").await.unwrap();
    response.assert_status(StatusCode::OK);

    let response = ctx.client.get("/health/ready").await.unwrap();
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn it_should_include_request_id_in_health_responses() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/health").await.unwrap();
    response.assert_header_exists("x-request-id");

    let response = ctx.client.get("/health/ready").await.unwrap();
    response.assert_header_exists("x-request-id");
}
