pub mod mock_tts_repository;
pub mod salute_tts_repository;
pub mod tts_repository;

pub use mock_tts_repository::MockTtsRepository;
pub use salute_tts_repository::SaluteTtsRepository;
pub use tts_repository::TtsRepository;

use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::config::{Config, ConfigError, TtsProvider};
use std::sync::Arc;

/// Pick the TTS provider named in the configuration
pub fn create_tts_repository(config: &Config) -> Result<Arc<dyn TtsRepository>, ConfigError> {
    let repository: Arc<dyn TtsRepository> = match &config.tts_provider {
        TtsProvider::Salute => Arc::new(SaluteTtsRepository::new(
            config.salute.clone(),
            Arc::new(SystemClock),
        )?),
        TtsProvider::Mock => Arc::new(MockTtsRepository::new()),
        TtsProvider::Unsupported(name) => {
            tracing::warn!(
                provider = %name,
                "Unsupported TTS provider, falling back to mock"
            );
            Arc::new(MockTtsRepository::new())
        }
    };

    tracing::info!(provider = repository.provider_name(), "TTS provider selected");
    Ok(repository)
}
