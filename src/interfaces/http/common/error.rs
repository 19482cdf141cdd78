//! Mapping of domain failures onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::ApiResponse;
use crate::shared::DomainError;

/// A [`DomainError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            e if e.is_conflict() => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.0 {
            DomainError::Validation(violations) => {
                ApiResponse::<()>::error("Validation failed").with_violations(violations)
            }
            DomainError::Storage(detail) => {
                error!(error = %detail, "Storage failure while serving request");
                ApiResponse::<()>::error("Internal storage error")
            }
            DomainError::Internal(detail) => {
                error!(error = %detail, "Internal failure while serving request");
                ApiResponse::<()>::error("Internal server error")
            }
            other => ApiResponse::<()>::error(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
