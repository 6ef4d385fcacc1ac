use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    /// Token endpoint failed or returned an unusable response
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Provider rejected a synthesis call after the retry budget was spent.
    /// `status` is `None` when no response was received.
    #[error("synthesis failed ({}) at {url}: {detail}", describe_status(.status))]
    Synthesis {
        status: Option<u16>,
        url: String,
        detail: String,
    },

    /// Chunk payloads could not be joined into one audio file
    #[error("failed to merge audio chunks: {0}")]
    AudioMerge(String),

    #[error("failed to store audio: {0}")]
    Io(#[from] std::io::Error),

    #[error("Озвучка еще не настроена.")]
    NotConfigured,
}

impl TtsError {
    /// Provider-specific equivalent of HTTP 401
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TtsError::Synthesis { status: Some(401), .. })
    }
}

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "no response".to_string(),
    }
}

impl From<TtsError> for AppError {
    fn from(err: TtsError) -> Self {
        match err {
            TtsError::Authentication(_)
            | TtsError::Synthesis { .. }
            | TtsError::AudioMerge(_) => {
                AppError::ExternalService(err.to_string())
            }
            TtsError::NotConfigured => AppError::ServiceUnavailable(err.to_string()),
            TtsError::Io(e) => AppError::Internal(e.to_string()),
        }
    }
}
