//! # Web API Error Types
//!
//! Maps service failures onto HTTP statuses. Leverages thiserror for
//! structured errors and Axum's IntoResponse for the HTTP conversion.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::error::HttpCheckError;

/// Web API errors with HTTP status code mappings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Resource not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Request canceled: {message}")]
    Timeout { message: String },

    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn invalid_uuid(uuid: &str) -> Self {
        Self::bad_request(format!("Invalid UUID format: {uuid}"))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            ApiError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Conflict { .. } => "CONFLICT",
            ApiError::Timeout { .. } => "REQUEST_CANCELED",
            ApiError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest { message }
            | ApiError::NotFound { message }
            | ApiError::Conflict { message }
            | ApiError::Timeout { message }
            | ApiError::ServiceUnavailable { message }
            | ApiError::Internal { message } => message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_response = json!({
            "error": {
                "code": self.error_code(),
                "message": self.message()
            }
        });

        (self.status_code(), Json(error_response)).into_response()
    }
}

impl From<HttpCheckError> for ApiError {
    fn from(err: HttpCheckError) -> Self {
        let message = err.to_string();
        match err {
            HttpCheckError::Validation(_) => ApiError::BadRequest { message },
            HttpCheckError::NotFound(_) => ApiError::NotFound { message },
            HttpCheckError::Conflict(_) => ApiError::Conflict { message },
            HttpCheckError::Canceled { .. } => ApiError::Timeout { message },
            HttpCheckError::StoreUnavailable(_) => ApiError::ServiceUnavailable { message },
            HttpCheckError::Database(_)
            | HttpCheckError::ResourceStore(_)
            | HttpCheckError::Configuration(_) => ApiError::Internal { message },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Result type alias for web API operations
pub type ApiResult<T> = Result<T, ApiError>;
