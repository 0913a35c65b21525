use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::error::{FieldViolation, ServiceError};

/// Handler-level errors and their HTTP mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("customer not found")]
    NotFound,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(v) => ApiError::Validation(v.violations),
            failure @ ServiceError::Failure { .. } => ApiError::Internal(failure.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    violations: Vec<FieldViolation>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.to_string();
        match self {
            ApiError::NotFound => status.into_response(),
            ApiError::Validation(violations) => {
                (status, Json(ErrorResponse { error, violations })).into_response()
            }
            ApiError::Internal(_) => (
                status,
                Json(ErrorResponse {
                    error,
                    violations: Vec::new(),
                }),
            )
                .into_response(),
        }
    }
}
