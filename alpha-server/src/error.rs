use alpha_core::AlphaError;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub const CREDENTIALS_DETAIL: &str = "Could not validate credentials";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[source] AlphaError),
}

/// Standard HTTP error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub status: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            detail: msg.into(),
            status: "error".to_string(),
        }
    }
}

impl ApiError {
    pub fn credentials() -> Self {
        ApiError::Unauthorized(CREDENTIALS_DETAIL.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AlphaError> for ApiError {
    fn from(err: AlphaError) -> Self {
        match err {
            AlphaError::Validation(msg) => ApiError::BadRequest(msg),
            AlphaError::NotFound(msg) => ApiError::NotFound(msg),
            AlphaError::Conflict(msg) => ApiError::Conflict(msg),
            AlphaError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            AlphaError::Token(_) => ApiError::credentials(),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let ApiError::Internal(ref source) = self {
            tracing::error!(error = %source, "Request failed");
        }

        let body = Json(ErrorResponse::new(self.to_string()));
        match self {
            ApiError::Unauthorized(_) => {
                (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}
