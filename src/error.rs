// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::validation::{RecordValidationError, ZoneValidationError};

/// One problem with one submitted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponseBody {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("not found")]
    NotFound,

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn internal<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }

    /// Field errors carried by a validation failure; empty otherwise.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            AppError::Validation(fields) => fields.as_slice(),
            _ => &[],
        }
    }
}

impl From<Vec<ZoneValidationError>> for AppError {
    fn from(errors: Vec<ZoneValidationError>) -> Self {
        AppError::Validation(
            errors
                .into_iter()
                .map(|e| FieldError {
                    field: e.field().as_str(),
                    message: e.to_string(),
                })
                .collect(),
        )
    }
}

impl From<RecordValidationError> for AppError {
    fn from(err: RecordValidationError) -> Self {
        AppError::Validation(vec![FieldError {
            field: err.field().as_str(),
            message: err.to_string(),
        }])
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg, fields) = match self {
            AppError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation failed".into(),
                fields,
            ),
            AppError::NotFound => (StatusCode::NOT_FOUND, "not found".into(), Vec::new()),
            AppError::Internal(err) => {
                tracing::error!("internal error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".into(),
                    Vec::new(),
                )
            }
        };

        let body = Json(ErrorResponseBody { error: msg, fields });
        (status, body).into_response()
    }
}
