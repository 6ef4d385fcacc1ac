use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::{
    domain::{
        message::InboundMessage,
        relay::{RelayRequest, RelayService, RelayServiceApi, START_GREETING},
        tts::format::content_type_for_extension,
    },
    error::{AppError, AppResult},
    infrastructure::auth::{AuthUser, RequestId},
};

pub const X_CHARACTER_COUNT: &str = "x-character-count";

/// Request for POST /api/messages/voice
#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceRequest {
    pub chat_id: i64,
    pub message_id: i64,
    pub message: InboundMessage,
}

/// Response for POST /api/start
#[derive(Debug, Serialize, Deserialize)]
pub struct StartResponse {
    pub text: String,
}

pub struct VoiceController {
    relay_service: Arc<RelayService>,
}

impl VoiceController {
    pub fn new(relay_service: Arc<RelayService>) -> Self {
        Self { relay_service }
    }

    /// POST /api/messages/voice - Voice an inbound message
    pub async fn synthesize(
        State(controller): State<Arc<VoiceController>>,
        Extension(RequestId(request_id)): Extension<RequestId>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<VoiceRequest>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        if request.chat_id == 0 {
            return Err(AppError::BadRequest("Missing chat id".to_string()));
        }

        tracing::info!(
            request_id = %request_id,
            user_id = auth_user.user_id,
            chat_id = request.chat_id,
            message_id = request.message_id,
            "Message received"
        );

        let result = controller
            .relay_service
            .relay(RelayRequest {
                request_id: request_id.clone(),
                chat_id: request.chat_id,
                message_id: request.message_id,
                message: request.message,
            })
            .await?;

        let audio = read_and_remove(&result.audio_path, &request_id).await?;

        let extension = result
            .audio_path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type_for_extension(extension)),
        );
        headers.insert(X_CHARACTER_COUNT, HeaderValue::from(result.char_count));

        Ok((StatusCode::OK, headers, Body::from(audio)))
    }

    /// POST /api/start - Greeting shown when a user opens the chat
    pub async fn start(
        Extension(RequestId(request_id)): Extension<RequestId>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> Json<StartResponse> {
        tracing::info!(
            request_id = %request_id,
            user_id = auth_user.user_id,
            "Start command"
        );

        Json(StartResponse {
            text: START_GREETING.to_string(),
        })
    }
}

/// Read the produced audio and delete the file whether or not the read
/// succeeded
async fn read_and_remove(path: &Path, request_id: &str) -> AppResult<Vec<u8>> {
    let audio = tokio::fs::read(path).await;

    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(
            request_id = %request_id,
            path = %path.display(),
            error = %e,
            "Failed to remove audio file"
        );
    }

    audio.map_err(|e| {
        AppError::Internal(format!("Failed to read audio file {}: {}", path.display(), e))
    })
}
