use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::ErrorResponse;
use crypto::CodecError;
use thiserror::Error;

/// Every failure a gateway operation can report to a caller
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing or malformed client input; detected before any backend call
    #[error("{0}")]
    Validation(String),
    /// Object missing or unreadable. Backend details are logged, not returned.
    #[error("File not found")]
    NotFound,
    /// Backend write or delete failure, surfaced as-is
    #[error("{0}")]
    Backend(String),
    #[error("Failed to issue file token: {0}")]
    Token(#[from] CodecError),
}

impl GatewayError {
    pub fn validation(message: impl Into<String>) -> Self {
        GatewayError::Validation(message.into())
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::Backend(_) | GatewayError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
