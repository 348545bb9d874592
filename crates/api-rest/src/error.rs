//! HTTP error mapping.

use api_shared::ErrorRes;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use patreg_core::PatientError;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Patient(#[from] PatientError),
    /// Path segment that cannot be an identifier, so no such patient can exist.
    #[error("Patient with ID {0} not found.")]
    UnknownId(String),
    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Patient(PatientError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Patient(PatientError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Patient(PatientError::DeletionNotPermitted { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Patient(PatientError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Patient(PatientError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UnknownId(_) => StatusCode::NOT_FOUND,
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn body(&self) -> ErrorRes {
        match self {
            ApiError::Patient(PatientError::Validation(errors)) => {
                let mut body = ErrorRes::new("One or more validation errors occurred.");
                body.errors = errors
                    .fields()
                    .map(|(field, messages)| (field.to_string(), messages.to_vec()))
                    .collect();
                body
            }
            ApiError::Patient(PatientError::Storage(_)) => ErrorRes::new("Internal error"),
            other => ErrorRes::new(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
