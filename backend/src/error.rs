//! Error handling for the Asset Inventory Platform
//!
//! Provides consistent JSON error responses with per-field detail for
//! validation failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::EntityKind;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Unique code errors
    /// A candidate code rejected by the store. Insert closures may return
    /// this or `Ok(None)`; the services' `ON CONFLICT (unique_code) DO
    /// NOTHING` inserts report the clash as `Ok(None)`, and
    /// [`CodeGenerator::assign`](crate::services::CodeGenerator::assign)
    /// retries both the same way.
    #[error("Unique code {code} already taken for {kind}")]
    DuplicateCode { kind: EntityKind, code: String },

    #[error("No free unique code for {kind} after {attempts} attempts")]
    CodeSpaceExhausted { kind: EntityKind, attempts: u32 },

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure on a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Map a unique violation on `field` to [`AppError::DuplicateEntry`],
    /// passing other database errors through.
    pub fn unique_violation(field: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
        move |err| match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::DuplicateEntry(field.to_string())
            }
            _ => AppError::DatabaseError(err),
        }
    }

    /// Map a foreign key violation on `table` to a validation error naming
    /// the referencing column, passing other database errors through.
    pub fn reference_violation(table: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
        move |err| match &err {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                // Postgres names these `{table}_{column}_fkey`
                let field = db_err
                    .constraint()
                    .and_then(|c| c.strip_suffix("_fkey"))
                    .and_then(|c| c.strip_prefix(table))
                    .and_then(|c| c.strip_prefix('_'))
                    .unwrap_or(table)
                    .to_string();
                AppError::validation(field, "Referenced record does not exist")
            }
            _ => AppError::DatabaseError(err),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message: format!("A record with this {} already exists", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::DuplicateCode { kind, code } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_CODE".to_string(),
                    message: format!("{} code {} is already in use", kind, code),
                    field: Some("unique_code".to_string()),
                },
            ),
            AppError::CodeSpaceExhausted { kind, .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "CODE_SPACE_EXHAUSTED".to_string(),
                    message: format!(
                        "Could not allocate a unique {} code, please retry",
                        kind
                    ),
                    field: Some("unique_code".to_string()),
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message: "A database error occurred".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
