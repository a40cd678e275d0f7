use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::{
    dao::storage::StorageError,
    dto::validation::{FieldViolation, field_violations},
};

/// Message returned while no storage backend is ready.
pub const UNAVAILABLE_MESSAGE: &str =
    "Database connection not ready. Please try again in a moment.";
/// Message returned with field-level violations.
pub const VALIDATION_MESSAGE: &str = "Validation failed";
/// Short cause attached to 503 bodies under `error`.
pub const UNAVAILABLE_CAUSE: &str = "Database unavailable";
/// Message returned for missing or malformed game identifiers.
pub const NOT_FOUND_MESSAGE: &str = "Game not found";

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend failed while serving the request.
    #[error("storage failure")]
    Storage(#[source] StorageError),
    /// Application is running in degraded mode without storage.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
    /// Payload failed validation; nothing was written.
    #[error("validation failed")]
    Validation(Vec<FieldViolation>),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Storage(err)
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        ServiceError::Validation(field_violations(&err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("{0}")]
    BadRequest(String),
    /// Field-level validation failure.
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),
    /// Requested resource not found.
    #[error("{0}")]
    NotFound(String),
    /// Service unavailable or degraded.
    #[error("{0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(StorageError::Unavailable { message, .. }) => {
                error!(%message, "storage unreachable while serving request");
                AppError::ServiceUnavailable(UNAVAILABLE_MESSAGE.into())
            }
            ServiceError::Storage(source @ StorageError::Backend { .. }) => {
                error!(error = %source, "storage operation failed");
                AppError::Internal("Unexpected database error".into())
            }
            ServiceError::Degraded => AppError::ServiceUnavailable(UNAVAILABLE_MESSAGE.into()),
            ServiceError::Validation(violations) => AppError::Validation(violations),
            ServiceError::NotFound(_) => AppError::NotFound(NOT_FOUND_MESSAGE.into()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::Validation(field_violations(&err))
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    /// Short cause, present on 503 responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = self.to_string();
        let (error, errors) = match self {
            AppError::Validation(violations) => (None, Some(violations)),
            AppError::ServiceUnavailable(_) => (Some(UNAVAILABLE_CAUSE.to_owned()), None),
            _ => (None, None),
        };

        (
            status,
            Json(ErrorBody {
                message,
                error,
                errors,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn maps_service_errors_to_status_codes() {
        let cases = [
            (ServiceError::Degraded, StatusCode::SERVICE_UNAVAILABLE),
            (
                ServiceError::NotFound("game `x`".into()),
                StatusCode::NOT_FOUND,
            ),
            (ServiceError::Validation(Vec::new()), StatusCode::BAD_REQUEST),
            (
                StorageError::unavailable("down".into(), io::Error::other("refused")).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                StorageError::backend("write".into(), io::Error::other("boom")).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (service_error, expected) in cases {
            let app_error: AppError = service_error.into();
            assert_eq!(app_error.into_response().status(), expected);
        }
    }

    #[test]
    fn storage_details_stay_out_of_messages() {
        let err: AppError =
            ServiceError::from(StorageError::backend("secret".into(), io::Error::other("x")))
                .into();
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn not_found_uses_public_message() {
        let err: AppError = ServiceError::NotFound("game `abc` not found".into()).into();
        assert_eq!(err.to_string(), NOT_FOUND_MESSAGE);
    }

    async fn body_of(err: AppError) -> serde_json::Value {
        let bytes = axum::body::to_bytes(err.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unavailable_body_names_the_cause() {
        let body = body_of(ServiceError::Degraded.into()).await;
        assert_eq!(body["message"], UNAVAILABLE_MESSAGE);
        assert_eq!(body["error"], UNAVAILABLE_CAUSE);
        assert!(body.get("errors").is_none());

        let body = body_of(AppError::NotFound(NOT_FOUND_MESSAGE.into())).await;
        assert!(body.get("error").is_none());
    }
}
