use super::tts_repository::TtsRepository;
use crate::domain::tts::{SynthesisRequest, TtsError};
use async_trait::async_trait;
use std::path::PathBuf;

/// Stand-in provider that refuses every request
#[derive(Debug, Default)]
pub struct MockTtsRepository;

impl MockTtsRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TtsRepository for MockTtsRepository {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<PathBuf, TtsError> {
        tracing::warn!(
            request_id = %request.request_id,
            service = "mock",
            "Synthesis requested but no TTS provider is configured"
        );
        Err(TtsError::NotConfigured)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
