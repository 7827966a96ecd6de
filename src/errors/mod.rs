//! Error handling module for the classroom backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::error::ErrorKind;

use crate::auth::AuthError;

/// Default messages for each status, used when no detail is more useful.
pub mod messages {
    pub const BAD_REQUEST: &str = "bad request";
    pub const NOT_FOUND: &str = "resource not found";
    pub const METHOD_NOT_ALLOWED: &str = "method not allowed";
    pub const UNPROCESSABLE: &str = "unprocessable";
    pub const INTERNAL_ERROR: &str = "internal server error";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed request input
    BadRequest(String),
    /// Drink title already in use
    DuplicateTitle(String),
    /// Resource not found
    NotFound(String),
    /// Route exists but not for this method
    MethodNotAllowed,
    /// The store rejected the write
    Unprocessable(String),
    /// Any other store failure
    Database(String),
    /// Invalid startup configuration
    Config(String),
    /// Raised by the authorization collaborator
    Auth(AuthError),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateTitle(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Auth(err) => err.status,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::DuplicateTitle(title) => {
                format!("a drink titled '{}' already exists", title)
            }
            AppError::NotFound(msg) => msg.clone(),
            AppError::MethodNotAllowed => messages::METHOD_NOT_ALLOWED.to_string(),
            AppError::Unprocessable(msg) => msg.clone(),
            // Store internals stay in the logs
            AppError::Database(_) => messages::INTERNAL_ERROR.to_string(),
            AppError::Config(msg) => msg.clone(),
            AppError::Auth(err) => err.description.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Database(detail) => write!(f, "{}: {}", self.status_code(), detail),
            _ => write!(f, "{}: {}", self.status_code(), self.message()),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound(messages::NOT_FOUND.to_string()),
            sqlx::Error::Database(db_err)
                if matches!(
                    db_err.kind(),
                    ErrorKind::UniqueViolation
                        | ErrorKind::ForeignKeyViolation
                        | ErrorKind::NotNullViolation
                        | ErrorKind::CheckViolation
                ) =>
            {
                tracing::warn!("Constraint violation: {}", db_err);
                AppError::Unprocessable(format!("{}: {}", messages::UNPROCESSABLE, db_err))
            }
            _ => {
                tracing::error!("Database error: {:?}", err);
                AppError::Database(format!("Database error: {}", err))
            }
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Database(format!("Stored JSON is unreadable: {}", err))
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {}", rejection.body_text());
        AppError::BadRequest(format!(
            "{}: {}",
            messages::BAD_REQUEST,
            rejection.body_text()
        ))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        // Non-numeric ids never match a resource
        tracing::debug!("Rejected path: {}", rejection.body_text());
        AppError::NotFound(messages::NOT_FOUND.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!(
            "{}: {}",
            messages::BAD_REQUEST,
            rejection.body_text()
        ))
    }
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
    /// Machine-readable code, only present for authorization failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        let code = match error {
            AppError::Auth(auth) => Some(auth.code.to_string()),
            _ => None,
        };

        Self {
            success: false,
            error: error.status_code().as_u16(),
            message: error.message(),
            code,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DuplicateTitle("Latte".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::Unprocessable("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Database("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_detail_is_hidden() {
        let err = AppError::Database("disk I/O error at /var/lib".into());
        let body = ErrorResponse::new(&err);
        assert_eq!(body.error, 500);
        assert_eq!(body.message, messages::INTERNAL_ERROR);
        assert!(body.code.is_none());
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_pool_failure_maps_to_500() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_auth_error_envelope_carries_code() {
        let err = AppError::Auth(AuthError::forbidden("Permission not found."));
        let body = ErrorResponse::new(&err);
        assert!(!body.success);
        assert_eq!(body.error, 403);
        assert_eq!(body.code.as_deref(), Some("unauthorized"));
        assert_eq!(body.message, "Permission not found.");
    }

    #[test]
    fn test_duplicate_title_message() {
        let err = AppError::DuplicateTitle("Water".into());
        assert!(err.message().contains("Water"));
        assert!(err.to_string().starts_with("400"));
    }
}
