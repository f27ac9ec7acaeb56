/// Error types for yatube-api
///
/// Every failure a handler can produce is an `AppError`; actix renders it
/// through `ResponseError` so callers always receive a JSON body.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::validators::messages;

/// Result type for yatube-api operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Name of the unique constraint on `follows (user_id, following_id)`.
pub const FOLLOW_UNIQUE_CONSTRAINT: &str = "uq_follows_user_following";
/// Name of the check constraint forbidding self follows.
pub const FOLLOW_NOT_SELF_CONSTRAINT: &str = "chk_follows_not_self";

/// Key under which errors that do not belong to one field are reported.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Field name -> messages, rendered as the `fields` object of a 400 response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-message convenience constructor.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Append every message of `other`.
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(())` when nothing was collected, otherwise a validation error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Payload failed field-level validation
    #[error("Validation error: invalid fields {:?}", .0.fields().collect::<Vec<_>>())]
    Validation(FieldErrors),

    /// Request body could not be understood at all
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No (valid) credentials on an endpoint that needs them
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed to touch the object
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a FieldErrors>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let (error, fields) = match self {
            AppError::Database(err) => {
                tracing::error!(error = %err, "database operation failed");
                ("Internal server error".to_string(), None)
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                ("Internal server error".to_string(), None)
            }
            AppError::Validation(fields) => ("Validation error".to_string(), Some(fields)),
            other => (other.to_string(), None),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error,
            status: status.as_u16(),
            fields,
        })
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            match db_err.constraint() {
                Some(FOLLOW_UNIQUE_CONSTRAINT) => {
                    return AppError::Validation(FieldErrors::single(
                        NON_FIELD_ERRORS,
                        messages::FOLLOW_NOT_UNIQUE,
                    ));
                }
                Some(FOLLOW_NOT_SELF_CONSTRAINT) => {
                    return AppError::Validation(FieldErrors::single(
                        "following",
                        messages::SELF_FOLLOW,
                    ));
                }
                _ => {}
            }
        }
        AppError::Database(err)
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                fields.add(&field.to_string(), message);
            }
        }
        fields
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.into())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
