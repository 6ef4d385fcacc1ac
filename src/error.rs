use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    /// Message carries nothing that can be voiced. The text is user-facing.
    #[error("{0}")]
    UnsupportedInput(String),

    #[error("TTS provider error: {0}")]
    ExternalService(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure - simplified to just message + status code
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ExternalService(_) => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to simplified error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.to_string(),
        }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() || status == StatusCode::BAD_GATEWAY {
            tracing::error!(
                error = %self,
                status = %status.as_u16(),
                "Request failed"
            );
        } else {
            tracing::warn!(
                error = %self,
                status = %status.as_u16(),
                "Request rejected"
            );
        }

        let error_response = self.to_response();

        (status, Json(error_response)).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
