//! Error responses for the account endpoints
//!
//! Every failure is rendered as `{"status": "error", "message": ...}` with a matching
//! HTTP status.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::AccountError;

pub const MISSING_FIELDS: &str = "Missing required fields.";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";
pub const BODY_TOO_LARGE: &str = "Request body too large.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or the body is not usable JSON
    #[error("{0}")]
    Validation(String),

    /// Unknown user or wrong password; the two are never distinguished
    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    /// A unique constraint rejected the write
    #[error("{0}")]
    Conflict(String),

    /// Body exceeded the configured limit
    #[error("{}", BODY_TOO_LARGE)]
    PayloadTooLarge,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn missing_fields() -> Self {
        ApiError::Validation(MISSING_FIELDS.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::UsernameTaken | AccountError::NewUsernameTaken => {
                ApiError::Conflict(err.to_string())
            }
            AccountError::UserNotFound => ApiError::NotFound(err.to_string()),
            AccountError::InvalidCredentials => ApiError::InvalidCredentials,
            AccountError::Store(_) | AccountError::Password(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::missing_fields()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref message) = self {
            tracing::error!(error = %message, "Request failed");
        }

        let status = self.status();
        let body = ErrorBody {
            status: "error",
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
