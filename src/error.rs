use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::accounts::StoreError;

/// Request-level error taxonomy. Domain variants carry the exact message the
/// frontend branches on; infrastructure failures collapse to a generic 500
/// with the detail kept server-side.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already registered")]
    EmailTaken,
    #[error("User not found")]
    NotFound,
    #[error("Email already verified")]
    AlreadyVerified,
    #[error("Invalid verification code")]
    InvalidCode,
    #[error("Verification code has expired")]
    CodeExpired,
    #[error("Email not verified")]
    NotVerified,
    #[error("Invalid email")]
    UnknownAccount,
    #[error("Invalid password")]
    BadCredentials,
    #[error("Server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::EmailTaken
            | ApiError::AlreadyVerified
            | ApiError::InvalidCode
            | ApiError::CodeExpired
            | ApiError::UnknownAccount
            | ApiError::BadCredentials => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::NotVerified => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            error!(error = ?e, "request failed");
        }
        let body = match &self {
            // The login form routes to the verification flow on this flag.
            ApiError::NotVerified => json!({ "message": self.to_string(), "verified": false }),
            _ => json!({ "message": self.to_string() }),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateKey => ApiError::EmailTaken,
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Unavailable(e) => ApiError::Internal(e),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}
