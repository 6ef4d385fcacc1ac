use super::error::RelayError;
use crate::domain::message::{extract_text, InboundMessage};
use crate::domain::preprocessing::preprocess_text;
use crate::domain::tts::SynthesisRequest;
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

pub const START_GREETING: &str =
    "Пришлите текст или репост сообщения/поста — я отвечу голосовым сообщением.";

#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub request_id: String,
    pub chat_id: i64,
    pub message_id: i64,
    pub message: InboundMessage,
}

#[derive(Debug, Clone)]
pub struct RelayResult {
    /// Produced audio file, owned by the caller from here on
    pub audio_path: PathBuf,
    pub char_count: usize,
}

pub struct RelayService {
    tts_repo: Arc<dyn TtsRepository>,
    preprocessing_enabled: bool,
}

impl RelayService {
    pub fn new(tts_repo: Arc<dyn TtsRepository>, preprocessing_enabled: bool) -> Self {
        Self {
            tts_repo,
            preprocessing_enabled,
        }
    }
}

#[async_trait]
pub trait RelayServiceApi: Send + Sync {
    /// Turn an inbound message into a voice file
    ///
    /// This operation:
    /// - Extracts the text to voice, prefixed for forwarded posts
    /// - Normalizes it when preprocessing is enabled
    /// - Hands it to the configured TTS provider
    async fn relay(&self, request: RelayRequest) -> Result<RelayResult, RelayError>;
}

#[async_trait]
impl RelayServiceApi for RelayService {
    async fn relay(&self, request: RelayRequest) -> Result<RelayResult, RelayError> {
        let text = extract_text(&request.message).map_err(|e| {
            tracing::info!(
                request_id = %request.request_id,
                chat_id = request.chat_id,
                message_id = request.message_id,
                "Message has nothing to voice"
            );
            e
        })?;

        let text = if self.preprocessing_enabled {
            preprocess_text(&text)
        } else {
            text
        };
        let char_count = text.chars().count();

        tracing::info!(
            request_id = %request.request_id,
            chat_id = request.chat_id,
            message_id = request.message_id,
            text_length = char_count,
            preprocessing = self.preprocessing_enabled,
            "Relaying message to TTS"
        );

        let synthesis = SynthesisRequest {
            text,
            request_id: request.request_id,
            chat_id: request.chat_id,
            message_id: request.message_id,
        };
        let audio_path = self.tts_repo.synthesize(&synthesis).await?;

        Ok(RelayResult {
            audio_path,
            char_count,
        })
    }
}
