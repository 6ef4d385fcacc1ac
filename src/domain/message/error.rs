use crate::error::AppError;

pub const UNSUPPORTED_MESSAGE_TEXT: &str =
    "Пожалуйста, отправьте текст или репост поддерживаемого сообщения.";

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("{0}")]
    Unsupported(String),
}

impl MessageError {
    pub fn unsupported() -> Self {
        MessageError::Unsupported(UNSUPPORTED_MESSAGE_TEXT.to_string())
    }
}

impl From<MessageError> for AppError {
    fn from(err: MessageError) -> Self {
        match err {
            MessageError::Unsupported(msg) => AppError::UnsupportedInput(msg),
        }
    }
}
