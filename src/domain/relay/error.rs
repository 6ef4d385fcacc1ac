use crate::domain::message::MessageError;
use crate::domain::tts::TtsError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Unsupported(#[from] MessageError),

    #[error(transparent)]
    Tts(#[from] TtsError),
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Unsupported(e) => e.into(),
            RelayError::Tts(e) => e.into(),
        }
    }
}
