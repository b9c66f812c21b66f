//! Request-level errors and their HTTP mapping.
//!
//! Client faults (bad input) and server faults (upstream failure, garbage
//! structured output) surface as distinct status codes; every other
//! degradation stays inside the response as a warning or explanation note.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Completion service unreachable or returned no extractable text.
    #[error("completion service failure: {0}")]
    Completion(String),

    /// The AI round trip succeeded but essential fields (translation text or
    /// segment mappings) could not be parsed out of the response.
    #[error("AI response missing essential fields: {0}")]
    AiResponse(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for TranslationError {
    fn into_response(self) -> Response {
        let status = match &self {
            TranslationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            TranslationError::Completion(_) | TranslationError::AiResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            TranslationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
