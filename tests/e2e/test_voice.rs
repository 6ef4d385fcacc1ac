use crate::e2e::helpers;

use helpers::{TestContext, ALLOWED_USER_ID};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::json;
use voice_relay::infrastructure::config::TtsProvider;
use wiremock::{
    matchers::{body_string, header, method, path, query_param},
    Mock, ResponseTemplate,
};

#[tokio::test]
async fn it_should_voice_a_text_message() {
    let ctx = TestContext::new().await.unwrap();
    ctx.mount_token("token-1").await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/text:synthesize"))
        .and(header("authorization", "Bearer token-1"))
        .and(query_param("format", "wav16"))
        .and(query_param("voice", "Nec_24000"))
        .and(body_string("Привет, мир!"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RIFF-audio".to_vec()))
        .expect(1)
        .mount(&ctx.salute)
        .await;

    let response = ctx
        .client
        .post_as(
            "/api/messages/voice",
            &json!({
                "chat_id": 42,
                "message_id": 7,
                "message": { "text": "Привет, мир!" }
            }),
            ALLOWED_USER_ID,
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/wav")
        .assert_header("x-character-count", "12")
        .assert_header_exists("x-request-id");
    assert_eq!(response.body_bytes, b"RIFF-audio".to_vec());
}

#[tokio::test]
async fn it_should_delete_audio_file_after_responding() {
    let ctx = TestContext::new().await.unwrap();
    ctx.mount_token("token-1").await;
    ctx.mount_synthesis(b"RIFF").await;

    let response = ctx
        .client
        .post_as(
            "/api/messages/voice",
            &json!({
                "chat_id": 42,
                "message_id": 8,
                "message": { "text": "Удалите меня." }
            }),
            ALLOWED_USER_ID,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.leftover_audio_files(), 0);
}

#[tokio::test]
async fn it_should_prefix_forwarded_channel_posts() {
    let ctx = TestContext::new().await.unwrap();
    ctx.mount_token("token-1").await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/text:synthesize"))
        .and(body_string("Пост из канала Новости.\n\nВышел релиз."))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RIFF".to_vec()))
        .expect(1)
        .mount(&ctx.salute)
        .await;

    let response = ctx
        .client
        .post_as(
            "/api/messages/voice",
            &json!({
                "chat_id": 42,
                "message_id": 9,
                "message": {
                    "text": "Вышел релиз.",
                    "forward_origin": {
                        "type": "channel",
                        "chat": { "type": "channel", "title": "Новости" }
                    }
                }
            }),
            ALLOWED_USER_ID,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn it_should_preprocess_text_when_enabled() {
    let ctx = TestContext::with_options(TtsProvider::Salute, true)
        .await
        .unwrap();
    ctx.mount_token("token-1").await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/text:synthesize"))
        .and(body_string("Привет мир."))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RIFF".to_vec()))
        .expect(1)
        .mount(&ctx.salute)
        .await;

    let response = ctx
        .client
        .post_as(
            "/api/messages/voice",
            &json!({
                "chat_id": 42,
                "message_id": 10,
                "message": { "text": "привет 👋мир" }
            }),
            ALLOWED_USER_ID,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn it_should_split_long_text_into_sequential_calls() {
    let ctx = TestContext::new().await.unwrap();
    ctx.mount_token("token-1").await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/text:synthesize"))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(TestContext::wav_audio(&[1, 2])),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&ctx.salute)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/text:synthesize"))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(TestContext::wav_audio(&[3, 4])),
        )
        .expect(1)
        .mount(&ctx.salute)
        .await;

    let paragraph = "а".repeat(2500);
    let response = ctx
        .client
        .post_as(
            "/api/messages/voice",
            &json!({
                "chat_id": 42,
                "message_id": 11,
                "message": { "text": format!("{}\n\n{}", paragraph, paragraph) }
            }),
            ALLOWED_USER_ID,
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/wav")
        .assert_header("x-character-count", "5002");
    let mut reader = hound::WavReader::new(std::io::Cursor::new(&response.body_bytes)).unwrap();
    assert_eq!(reader.len(), 4);
    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn it_should_retry_once_after_unauthorized() {
    let ctx = TestContext::new().await.unwrap();
    Mock::given(method("POST"))
        .and(path("/api/v2/oauth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "stale-token",
            "expires_in": 1800,
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&ctx.salute)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/oauth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-token",
            "expires_in": 1800,
        })))
        .expect(1)
        .mount(&ctx.salute)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/text:synthesize"))
        .and(header("authorization", "Bearer stale-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&ctx.salute)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/text:synthesize"))
        .and(header("authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RIFF".to_vec()))
        .expect(1)
        .mount(&ctx.salute)
        .await;

    let response = ctx
        .client
        .post_as(
            "/api/messages/voice",
            &json!({
                "chat_id": 42,
                "message_id": 12,
                "message": { "text": "Повторите, пожалуйста." }
            }),
            ALLOWED_USER_ID,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn it_should_return_bad_gateway_when_synthesis_fails() {
    let ctx = TestContext::new().await.unwrap();
    ctx.mount_token("token-1").await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/text:synthesize"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal provider error"))
        .expect(1)
        .mount(&ctx.salute)
        .await;

    let response = ctx
        .client
        .post_as(
            "/api/messages/voice",
            &json!({
                "chat_id": 42,
                "message_id": 13,
                "message": { "text": "Сломайся." }
            }),
            ALLOWED_USER_ID,
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("status 500");
    assert_eq!(ctx.leftover_audio_files(), 0);
}

#[tokio::test]
async fn it_should_reject_messages_without_text() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post_as(
            "/api/messages/voice",
            &json!({
                "chat_id": 42,
                "message_id": 14,
                "message": { "caption": "   " }
            }),
            ALLOWED_USER_ID,
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_error_message("Пожалуйста, отправьте текст или репост поддерживаемого сообщения.");
}

#[tokio::test]
async fn it_should_reject_missing_chat_id() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post_as(
            "/api/messages/voice",
            &json!({
                "chat_id": 0,
                "message_id": 15,
                "message": { "text": "Привет" }
            }),
            ALLOWED_USER_ID,
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Missing chat id");
}

#[tokio::test]
async fn it_should_forbid_users_outside_the_allowlist() {
    let ctx = TestContext::new().await.unwrap();

    let body = json!({
        "chat_id": 42,
        "message_id": 16,
        "message": { "text": "Привет" }
    });

    let response = ctx
        .client
        .post_as("/api/messages/voice", &body, 999)
        .await
        .unwrap();
    response.assert_status(StatusCode::FORBIDDEN);

    let response = ctx.client.post("/api/messages/voice", &body).await.unwrap();
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn it_should_report_unconfigured_provider() {
    let ctx = TestContext::with_options(TtsProvider::Mock, false)
        .await
        .unwrap();

    let response = ctx
        .client
        .post_as(
            "/api/messages/voice",
            &json!({
                "chat_id": 42,
                "message_id": 17,
                "message": { "text": "Привет" }
            }),
            ALLOWED_USER_ID,
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .assert_error_message("Озвучка еще не настроена.");
}

#[tokio::test]
async fn it_should_greet_on_start() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post_as("/api/start", &json!({}), ALLOWED_USER_ID)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let text = response
        .body
        .as_ref()
        .and_then(|b| b.get("text"))
        .and_then(|t| t.as_str())
        .unwrap();
    assert!(text.starts_with("Пришлите текст или репост"));
    assert!(response.header("x-request-id").is_some());
}
