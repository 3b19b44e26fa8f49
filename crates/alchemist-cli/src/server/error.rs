//! API error types and handling.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use alchemist::AlchemistError;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from client.
    BadRequest(String),
    /// AI gateway missing or failed; reported as `500 {"error": ...}`.
    Gateway(String),
    /// Internal server error.
    Internal(String),
    /// Error from the alchemist library.
    Alchemist(AlchemistError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Gateway(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Alchemist(e) => match e {
                AlchemistError::RowOutOfRange { .. } => StatusCode::NOT_FOUND,
                AlchemistError::StaleFix { .. } => StatusCode::CONFLICT,
                AlchemistError::Io { .. } | AlchemistError::Persistence(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                AlchemistError::Llm(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Gateway(msg) => ErrorResponse {
                error: msg,
                message: None,
            },
            ApiError::NotFound(msg) => ErrorResponse {
                error: "not_found".to_string(),
                message: Some(msg),
            },
            ApiError::BadRequest(msg) => ErrorResponse {
                error: "bad_request".to_string(),
                message: Some(msg),
            },
            ApiError::Internal(msg) => ErrorResponse {
                error: "internal".to_string(),
                message: Some(msg),
            },
            ApiError::Alchemist(e) => ErrorResponse {
                error: "alchemist_error".to_string(),
                message: Some(e.to_string()),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AlchemistError> for ApiError {
    fn from(err: AlchemistError) -> Self {
        ApiError::Alchemist(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Gateway(msg) => write!(f, "AI gateway error: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Alchemist(e) => write!(f, "Alchemist error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
