use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ErrorResponse;
use crate::models::anime::ValidationErrors;
use crate::services::{AnimeError, AuthError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    Forbidden(String),

    Unauthorized(String),

    ValidationError(ValidationErrors),

    StoreUnavailable(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            Self::ValidationError(errors) => write!(f, "Validation error: {errors}"),
            Self::StoreUnavailable(msg) => write!(f, "Store unavailable: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::new(msg)),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorResponse::new(msg)),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ErrorResponse::new(msg)),
            Self::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new("Validation failed").with_details(errors.into_errors()),
            ),
            Self::StoreUnavailable(msg) => {
                tracing::error!("Store error: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("The data store is unavailable"),
                )
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("An internal error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(format!("{err:#}"))
    }
}

impl From<AnimeError> for ApiError {
    fn from(err: AnimeError) -> Self {
        match err {
            AnimeError::NotFound(_) => Self::not_found(),
            AnimeError::Forbidden { .. } => {
                Self::Forbidden("You do not own this anime".to_string())
            }
            AnimeError::Validation(errors) => Self::ValidationError(errors),
            AnimeError::Database(msg) => Self::StoreUnavailable(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidApiKey => Self::unauthorized(),
            AuthError::Database(msg) => Self::StoreUnavailable(msg),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::ValidationError(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::ValidationError(ValidationErrors::single("body", rejection.body_text()))
    }
}

impl ApiError {
    /// Same body for every resource and id.
    #[must_use]
    pub fn not_found() -> Self {
        Self::NotFound("The requested resource was not found".to_string())
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::Unauthorized("A valid bearer token is required".to_string())
    }
}
