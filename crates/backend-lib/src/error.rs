// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use crate::validation::FieldViolation;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error taxonomy.
///
/// Component-level failures (hashing, signing) are caught at the handler
/// boundary and mapped into one of these variants; nothing below the
/// handlers returns a raw error to the transport layer.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("User already exists")]
    DuplicateAccount,

    /// Identical for "no such account" and "wrong password" so responses
    /// cannot be used to enumerate accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, forged, or expired session token. The cause is
    /// never surfaced to the client.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid CSRF token")]
    InvalidCsrfToken,

    #[error("Too many requests, please try again later")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateAccount => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InvalidCsrfToken => StatusCode::FORBIDDEN,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) | AppError::Io(_) | AppError::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// The message sent to the client. Internal detail never leaves the
    /// server; 500-class errors all collapse to the same generic body.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Validation(_) => "Validation failed".to_string(),
            AppError::Internal(_) | AppError::Io(_) | AppError::Json(_) => {
                "Something went wrong!".to_string()
            },
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal error");
        }

        let body = match &self {
            AppError::Validation(violations) => serde_json::json!({
                "message": self.client_message(),
                "errors": violations,
            }),
            _ => serde_json::json!({
                "message": self.client_message(),
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<crate::store::DuplicateEmail> for AppError {
    fn from(_: crate::store::DuplicateEmail) -> Self {
        AppError::DuplicateAccount
    }
}

impl From<crate::auth::token::TokenError> for AppError {
    fn from(err: crate::auth::token::TokenError) -> Self {
        use crate::auth::token::TokenError;
        match err {
            TokenError::Expired | TokenError::Invalid => AppError::Unauthorized,
            TokenError::Signing(msg) => AppError::Internal(msg),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("task join failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldViolation;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DuplicateAccount.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::InvalidCsrfToken.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::RateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let err = AppError::Internal("scrypt params out of range".to_string());
        assert_eq!(err.client_message(), "Something went wrong!");

        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        assert_eq!(
            AppError::Json(json_err).client_message(),
            "Something went wrong!"
        );
    }

    #[test]
    fn test_credential_errors_share_a_message() {
        // Account-enumeration resistance: both causes read identically.
        assert_eq!(
            AppError::InvalidCredentials.client_message(),
            "Invalid credentials"
        );
    }

    #[test]
    fn test_app_error_into_response() {
        let response = AppError::InvalidCsrfToken.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("application/json"));
    }

    #[test]
    fn test_validation_response_carries_field_detail() {
        let err = AppError::Validation(vec![FieldViolation::new(
            "email",
            "must be a well-formed email address",
        )]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
