//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] used consistently
//! across the identity backend. It follows the `thiserror` pattern for ergonomic error handling.
//!
//! ## Error Categories
//!
//! 1. **Client Errors** (4xx) - correctable by the caller
//!    - [`InvalidInput`](AppError::InvalidInput) → 400 Bad Request (carries the field)
//!    - [`InvalidCredentials`](AppError::InvalidCredentials) → 401 Unauthorized
//!    - [`NotFound`](AppError::NotFound) → 404 Not Found
//!    - [`UsernameTaken`](AppError::UsernameTaken) / [`EmailTaken`](AppError::EmailTaken) → 409 Conflict
//!
//! 2. **Token Errors** (401) - kept apart so clients can tell "log in again"
//!    ([`TokenExpired`](AppError::TokenExpired)) from "rejected outright"
//!    ([`TokenMalformed`](AppError::TokenMalformed), [`SignatureInvalid`](AppError::SignatureInvalid))
//!
//! 3. **Server Errors** (5xx) - fatal to the request, never to the process
//!    - [`HashingFailure`](AppError::HashingFailure), [`SigningFailure`](AppError::SigningFailure),
//!      [`KeyUnavailable`](AppError::KeyUnavailable), [`Persistence`](AppError::Persistence),
//!      [`Config`](AppError::Config), [`Internal`](AppError::Internal)
//!
//! Server error details are logged, never sent to clients. No variant ever
//! carries a password, a password hash, or the signing key.

use crate::dto::ErrorResponse;
use crate::model::store::{StoreError, UniqueField};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lib_auth::{pwd, token};
use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    /// Input failed validation; `field` names the offending request field.
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already registered")]
    EmailTaken,

    /// Unknown username or wrong password. Deliberately undifferentiated.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Hashing failure: {0}")]
    HashingFailure(String),

    #[error("Signing failure: {0}")]
    SigningFailure(String),

    #[error("Signing key unavailable")]
    KeyUnavailable,

    /// Protected route called without a `Bearer` Authorization header.
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Malformed token: {0}")]
    TokenMalformed(String),

    #[error("Invalid token signature")]
    SignatureInvalid,

    /// Storage backend failure (connection, I/O, unexpected constraint).
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (unexpected failures).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for [`AppError::InvalidInput`].
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        AppError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            AppError::UsernameTaken | AppError::EmailTaken => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials
            | AppError::MissingToken
            | AppError::TokenExpired
            | AppError::TokenNotYetValid
            | AppError::TokenMalformed(_)
            | AppError::SignatureInvalid => StatusCode::UNAUTHORIZED,
            AppError::HashingFailure(_)
            | AppError::SigningFailure(_)
            | AppError::KeyUnavailable
            | AppError::Persistence(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput { .. } => "InvalidInput",
            AppError::UsernameTaken => "UsernameTaken",
            AppError::EmailTaken => "EmailTaken",
            AppError::InvalidCredentials => "InvalidCredentials",
            AppError::NotFound(_) => "NotFound",
            AppError::HashingFailure(_) => "HashingFailure",
            AppError::SigningFailure(_) => "SigningFailure",
            AppError::KeyUnavailable => "KeyUnavailable",
            AppError::MissingToken => "MissingToken",
            AppError::TokenExpired => "TokenExpired",
            AppError::TokenNotYetValid => "TokenNotYetValid",
            AppError::TokenMalformed(_) => "TokenMalformed",
            AppError::SignatureInvalid => "SignatureInvalid",
            AppError::Persistence(_) => "Persistence",
            AppError::Config(_) => "Config",
            AppError::Internal(_) => "Internal",
        }
    }

    /// The wire body for this error.
    pub fn to_error_response(&self) -> ErrorResponse {
        let field = match self {
            AppError::InvalidInput { field, .. } => Some(field.to_string()),
            _ => None,
        };

        ErrorResponse {
            error: self.user_message(),
            code: self.code().to_string(),
            field,
        }
    }

    /// Get a user-friendly error message.
    ///
    /// For server errors, returns a generic message to avoid exposing implementation details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput { reason, .. } => reason.clone(),
            AppError::TokenMalformed(_) => "Malformed token".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::HashingFailure(_)
            | AppError::SigningFailure(_)
            | AppError::KeyUnavailable
            | AppError::Persistence(_)
            | AppError::Config(_)
            | AppError::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

/// Implement Axum's `IntoResponse` for automatic error handling.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log error details (full error message for server logs)
        if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

impl From<pwd::Error> for AppError {
    fn from(err: pwd::Error) -> Self {
        match err {
            pwd::Error::HashingFailure(msg) => AppError::HashingFailure(msg),
            pwd::Error::InvalidCost(msg) => AppError::Config(msg),
        }
    }
}

impl From<token::Error> for AppError {
    fn from(err: token::Error) -> Self {
        match err {
            token::Error::KeyUnavailable => AppError::KeyUnavailable,
            token::Error::SigningFailure(msg) => AppError::SigningFailure(msg),
            token::Error::TokenExpired => AppError::TokenExpired,
            token::Error::TokenNotYetValid => AppError::TokenNotYetValid,
            token::Error::TokenMalformed(msg) => AppError::TokenMalformed(msg),
            token::Error::SignatureInvalid => AppError::SignatureInvalid,
        }
    }
}

/// Store conflicts that reach this conversion carry a known field; callers
/// that need to resolve an unknown field do so before converting.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(Some(UniqueField::Username)) => AppError::UsernameTaken,
            StoreError::Conflict(Some(UniqueField::Email)) => AppError::EmailTaken,
            StoreError::Conflict(None) => {
                AppError::Persistence("unique constraint violated".to_string())
            }
            StoreError::Persistence(msg) => AppError::Persistence(msg),
        }
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::invalid_input("email", "Invalid email format").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::UsernameTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::SignatureInvalid.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::NotFound("Account not found".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::KeyUnavailable.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Persistence("disk I/O error at /var/lib/identity.db".to_string());
        assert_eq!(err.user_message(), "An internal error occurred");

        let err = AppError::TokenMalformed("Json(Error(\"missing field\"))".to_string());
        assert_eq!(err.user_message(), "Malformed token");
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = AppError::invalid_input("email", "Invalid email format").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error": "Invalid email format",
                "code": "InvalidInput",
                "field": "email",
            })
        );

        let response = AppError::Persistence("disk full".to_string()).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed, AppError::Persistence("disk full".to_string()).to_error_response());
        assert_eq!(parsed.field, None);
        assert!(!String::from_utf8_lossy(&body).contains("field"));
    }

    #[test]
    fn test_token_error_conversion() {
        assert_eq!(AppError::from(token::Error::TokenExpired), AppError::TokenExpired);
        assert_eq!(AppError::from(token::Error::KeyUnavailable), AppError::KeyUnavailable);
        assert_eq!(
            AppError::from(token::Error::SignatureInvalid),
            AppError::SignatureInvalid
        );
    }

    #[test]
    fn test_store_error_conversion() {
        assert_eq!(
            AppError::from(StoreError::Conflict(Some(UniqueField::Username))),
            AppError::UsernameTaken
        );
        assert_eq!(
            AppError::from(StoreError::Conflict(Some(UniqueField::Email))),
            AppError::EmailTaken
        );
        assert!(matches!(
            AppError::from(StoreError::Persistence("boom".to_string())),
            AppError::Persistence(_)
        ));
    }
}
