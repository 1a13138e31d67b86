use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use lexcase_core::ValidationError;
use lexcase_intake::IntakeError;
use lexcase_repo::RepoError;

use crate::api::schemas::{ErrorResponse, ValidationErrorResponse};

/// Errors that can occur when running the Lexcase server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The request body failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The addressed resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A case repository error surfaced through the API.
    #[error("repository error: {0}")]
    Repository(#[from] RepoError),
}

impl From<IntakeError> for ServerError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::Validation(e) => Self::Validation(e),
            IntakeError::Persistence(e) => Self::Repository(e),
            IntakeError::Configuration(msg) => Self::Config(msg),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(e) => {
                let body = ValidationErrorResponse {
                    error: "validation failed".to_owned(),
                    fields: e.fields,
                };
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
            }
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Repository(RepoError::CaseNotFound(id)) => {
                (StatusCode::NOT_FOUND, format!("case not found: {id}"))
            }
            Self::Repository(e) => {
                tracing::error!(error = %e, "repository error");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            Self::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Self::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use lexcase_core::{CaseId, FieldError};

    use super::*;

    #[test]
    fn validation_maps_to_422() {
        let err = ServerError::from(IntakeError::Validation(ValidationError {
            fields: vec![FieldError::new("title", "must not be empty")],
        }));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn persistence_maps_to_500() {
        let err = ServerError::from(IntakeError::Persistence(RepoError::Connection(
            "refused".into(),
        )));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn missing_case_maps_to_404() {
        let err = ServerError::Repository(RepoError::CaseNotFound(CaseId::generate()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
