//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::auth::AuthError;
use crate::domain::{DomainError, ValidationErrors};
use crate::ledger::LedgerError;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Validation failed")]
    Validation(ValidationErrors),

    #[error("Login already in use: {0}")]
    DuplicateLogin(String),

    #[error("National id already registered: {0}")]
    DuplicateNationalId(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::DuplicateLogin(login) => AppError::DuplicateLogin(login),
            DomainError::DuplicateNationalId(id) => AppError::DuplicateNationalId(id),
            DomainError::AccountNotFound(login) => AppError::AccountNotFound(login),
            DomainError::InvalidCredentials => {
                AppError::Authentication("invalid login or password".to_string())
            }
            DomainError::Unauthenticated => {
                AppError::Authentication("authentication required".to_string())
            }
            DomainError::BalanceOutOfRange => {
                let mut errors = ValidationErrors::new();
                errors.add("amount", "would move the balance out of range");
                AppError::Validation(errors)
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::DuplicateLogin(login) => AppError::DuplicateLogin(login),
            LedgerError::DuplicateNationalId(id) => AppError::DuplicateNationalId(id),
            LedgerError::AccountNotFound(login) => AppError::AccountNotFound(login),
            LedgerError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        if err.is_client_error() {
            AppError::Authentication(err.to_string())
        } else {
            AppError::Internal(err.to_string())
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl AppError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::AccountNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateLogin(_) | AppError::DuplicateNationalId(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error_code, details, fields) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => ("invalid_request", Some(msg.clone()), None),
            AppError::Validation(errors) => ("validation_error", None, Some(errors.fields().clone())),

            // 401 Unauthorized
            AppError::Authentication(_) => ("authentication_failed", None, None),

            // 404 Not Found
            AppError::AccountNotFound(login) => ("account_not_found", Some(login.clone()), None),

            // 409 Conflict
            AppError::DuplicateLogin(_) => ("duplicate_login", None, None),
            AppError::DuplicateNationalId(_) => ("duplicate_national_id", None, None),

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ("internal_error", None, None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("internal_error", None, None)
            }
        };

        // Never echo internals back to the caller
        let error = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            timestamp: Utc::now(),
            details,
            fields,
        };

        (status, Json(body)).into_response()
    }
}
