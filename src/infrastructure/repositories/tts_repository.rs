use crate::domain::tts::{SynthesisRequest, TtsError};
use async_trait::async_trait;
use std::path::PathBuf;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (SaluteSpeech, or the mock used
/// until one is configured).
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Splitting text into chunks if needed
/// - Merging audio chunks into a single audio file
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text to speech and store the audio on disk
    ///
    /// Returns the path of the produced file. The caller owns the file and
    /// deletes it once the audio has been delivered.
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<PathBuf, TtsError>;

    /// Short provider name for logs and health checks
    fn provider_name(&self) -> &'static str;
}
