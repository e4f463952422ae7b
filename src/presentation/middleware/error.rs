use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::domain::value_objects::PageRequestError;
use crate::infrastructure::storage::StorageError;

/// Application error types that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Authorization failed: {message}")]
    Authorization { message: String },

    #[error("Validation failed: {errors:?}")]
    Validation { errors: HashMap<String, String> },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Empty file: {message}")]
    EmptyFile { message: String },

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Request too large: {message}")]
    PayloadTooLarge { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Service temporarily unavailable: {message}")]
    ServiceUnavailable { message: String },
}

impl AppError {
    /// Build a validation error for a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = HashMap::new();
        errors.insert(field.into(), message.into());
        AppError::Validation { errors }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            AppError::Authorization { .. } => StatusCode::FORBIDDEN,
            AppError::Validation { .. }
            | AppError::BadRequest { .. }
            | AppError::EmptyFile { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database { .. } | AppError::Storage { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the error type for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Authentication { .. } => "authentication",
            AppError::Authorization { .. } => "authorization",
            AppError::Validation { .. } => "validation",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::EmptyFile { .. } => "empty_file",
            AppError::BadRequest { .. } => "bad_request",
            AppError::PayloadTooLarge { .. } => "payload_too_large",
            AppError::Database { .. } => "database",
            AppError::Storage { .. } => "storage",
            AppError::Internal { .. } => "internal",
            AppError::ServiceUnavailable { .. } => "service_unavailable",
        }
    }

    /// Check if this error should be logged as an error (vs warning)
    pub fn should_log_as_error(&self) -> bool {
        matches!(
            self,
            AppError::Database { .. }
                | AppError::Storage { .. }
                | AppError::Internal { .. }
                | AppError::ServiceUnavailable { .. }
        )
    }

    /// Create error response with proper structure
    pub fn to_error_response(&self, request_id: Option<&str>) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                id: Uuid::new_v4().to_string(),
                error_type: self.error_type().to_string(),
                message: self.to_string(),
                details: self.get_details(),
                request_id: request_id.map(String::from),
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    fn get_details(&self) -> Option<Value> {
        match self {
            AppError::Validation { errors } => Some(json!({ "validation_errors": errors })),
            AppError::NotFound { resource } => Some(json!({ "resource": resource })),
            _ => None,
        }
    }
}

/// Structured error response
#[derive(serde::Serialize, Debug)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(serde::Serialize, Debug)]
pub struct ErrorDetail {
    pub id: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = self.to_error_response(None);

        if self.should_log_as_error() {
            error!(
                error_type = self.error_type(),
                error_id = error_response.error.id,
                "Application error: {}",
                self
            );
        } else {
            warn!(
                error_type = self.error_type(),
                error_id = error_response.error.id,
                "Application warning: {}",
                self
            );
        }

        (status, Json(error_response)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database { message: err.to_string() }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage { message: err.to_string() }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest { message: format!("Invalid JSON: {err}") }
    }
}

impl From<PageRequestError> for AppError {
    fn from(err: PageRequestError) -> Self {
        let field = match err {
            PageRequestError::NegativePageNumber(_) => "pageNumber",
            PageRequestError::PageSizeTooSmall(_) => "pageSize",
            PageRequestError::OutOfRange(_) => "page",
        };
        AppError::validation(field, err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::AlreadyExists { filename } => AppError::Conflict {
                message: format!(
                    "File already exists: {filename}! Please enter another file name!"
                ),
            },
            StorageError::FileNotFound { filename } => {
                AppError::NotFound { resource: format!("File {filename}") }
            }
            StorageError::InvalidFilename { filename } => {
                AppError::BadRequest { message: format!("Invalid file name: {filename}") }
            }
            StorageError::IoError { message } => AppError::Storage { message },
        }
    }
}
