//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::store::StoreError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Staff credentials required")]
    Unauthorized,
    #[error("Patient credentials required")]
    PatientUnauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Registration rejected: {0}")]
    Registration(String),
    #[error("No account for this phone number")]
    UnknownAccount,
    #[error("Wrong password")]
    WrongPassword,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "STAFF_AUTH_REQUIRED",
                "Valid staff credentials required".to_string(),
            ),
            ApiError::PatientUnauthorized => (
                StatusCode::UNAUTHORIZED,
                "PATIENT_AUTH_REQUIRED",
                "Valid patient phone and password required".to_string(),
            ),
            ApiError::Forbidden(detail) => (StatusCode::FORBIDDEN, "FORBIDDEN", detail.clone()),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Registration(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "REGISTRATION_INVALID",
                detail.clone(),
            ),
            ApiError::UnknownAccount => (
                StatusCode::NOT_FOUND,
                "ACCOUNT_NOT_FOUND",
                "No account registered for this phone number".to_string(),
            ),
            ApiError::WrongPassword => (
                StatusCode::UNAUTHORIZED,
                "WRONG_PASSWORD",
                "Wrong password".to_string(),
            ),
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, "CONFLICT", detail.clone()),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PatientNotFound(id) => ApiError::NotFound(format!("Patient not found: {id}")),
            StoreError::AlertNotFound(id) => ApiError::NotFound(format!("Alert not found: {id}")),
            StoreError::PushNotFound(id) => ApiError::NotFound(format!("Push not found: {id}")),
            StoreError::Registration(e) => ApiError::Registration(e.to_string()),
            StoreError::UnknownAccount => ApiError::UnknownAccount,
            StoreError::WrongPassword => ApiError::WrongPassword,
            e @ (StoreError::Io(_) | StoreError::Serialization(_) | StoreError::LockPoisoned) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::SessionNotFound(id) => ApiError::NotFound(format!("Chat session not found: {id}")),
            CoreError::SessionCompleted(_) => {
                ApiError::Conflict("Report already completed; reset the session to start again".into())
            }
            CoreError::Store(e) => e.into(),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("blocking task failed: {err}"))
    }
}
