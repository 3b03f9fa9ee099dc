//! Error types for the Local Library server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    models::Dependent,
    validation::{FieldError, FormInput, ValidationFailure},
};

/// Numeric error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    StoreFailure = 3,
    NotFound = 4,
    ValidationFailed = 5,
    ReferentialConflict = 6,
    AuthFailure = 7,
    BadValue = 8,
    Duplicate = 9,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Referential conflict: {} dependent(s) still reference this entity", .0.len())]
    ReferentialConflict(Vec<Dependent>),

    #[error("Validation failed: {} error(s)", .0.errors.len())]
    ValidationFailed(ValidationFailure),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Store failure: {0}")]
    StoreFailure(String),

    #[error("Authentication lookup failed: {0}")]
    AuthFailure(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// PostgreSQL `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                AppError::Duplicate(db.constraint().unwrap_or("unique key").to_string())
            }
            _ => AppError::StoreFailure(e.to_string()),
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Field errors, in rule order (validation failures only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    /// Sanitized input echoed back so the form can be redisplayed
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub input: Option<FormInput>,
    /// Live dependents blocking a delete
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub dependents: Option<Vec<Dependent>>,
}

impl ErrorResponse {
    fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            errors: None,
            input: None,
            dependents: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match self {
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorResponse::new(ErrorCode::NotFound, msg))
            }
            AppError::ReferentialConflict(dependents) => {
                let mut body = ErrorResponse::new(ErrorCode::ReferentialConflict, message);
                body.dependents = Some(dependents);
                (StatusCode::CONFLICT, body)
            }
            AppError::ValidationFailed(failure) => {
                let mut body = ErrorResponse::new(ErrorCode::ValidationFailed, message);
                body.errors = Some(failure.errors);
                body.input = Some(failure.input);
                (StatusCode::UNPROCESSABLE_ENTITY, body)
            }
            AppError::Duplicate(_) => {
                (StatusCode::CONFLICT, ErrorResponse::new(ErrorCode::Duplicate, message))
            }
            AppError::StoreFailure(cause) => {
                tracing::error!("Store failure: {}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(ErrorCode::StoreFailure, "Store failure".to_string()),
                )
            }
            AppError::AuthFailure(cause) => {
                tracing::error!("Authentication lookup failed: {}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(ErrorCode::AuthFailure, "Authentication unavailable".to_string()),
                )
            }
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorResponse::new(ErrorCode::NotAuthorized, msg))
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(ErrorCode::BadValue, msg))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(ErrorCode::Failure, "Internal server error".to_string()),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
