use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness plus the TTS provider requests are routed to
pub async fn health_ready(State(tts_provider): State<&'static str>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "tts_provider": tts_provider
        })),
    )
}
