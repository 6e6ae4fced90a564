//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::messages;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Application-level errors with HTTP status mapping.
///
/// Variant messages are the user-facing (localized) text; provider and
/// internal detail is logged where the error is constructed, never surfaced.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Expired: {0}")]
    Expired(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Expired(m) => (StatusCode::GONE, "link_expired", m.as_str()),
            AppError::Conflict(m) => (StatusCode::CONFLICT, "conflict", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            // Provider faults are generic for the user; detail stays in logs.
            AppError::Provider(_) => (
                StatusCode::BAD_GATEWAY,
                "provider_error",
                messages::GENERIC_FAILURE,
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                messages::GENERIC_FAILURE,
            ),
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".into()),
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl From<jiwar_core::bridge::BridgeError> for AppError {
    fn from(e: jiwar_core::bridge::BridgeError) -> Self {
        use jiwar_core::bridge::BridgeError;
        match e {
            BridgeError::DuplicateMember => {
                AppError::Conflict(messages::ALREADY_REGISTERED.into())
            }
            BridgeError::Db(e) => AppError::from(e),
        }
    }
}

impl From<jiwar_core::provider::ProviderError> for AppError {
    fn from(e: jiwar_core::provider::ProviderError) -> Self {
        use jiwar_core::provider::ProviderError;
        match e {
            ProviderError::NotFound => AppError::NotFound(messages::GENERIC_FAILURE.into()),
            ProviderError::Conflict => AppError::Conflict(messages::ALREADY_REGISTERED.into()),
            ProviderError::Unauthorized => {
                AppError::Unauthorized(messages::GRANT_EXPIRED.into())
            }
            // Recovered where it occurs; reaching here means a flow forgot to.
            ProviderError::SessionActive => {
                AppError::Internal("unhandled session-active signal".into())
            }
            ProviderError::Http(m) | ProviderError::Unexpected(m) => AppError::Provider(m),
        }
    }
}

impl From<jiwar_core::telegram::TelegramError> for AppError {
    fn from(e: jiwar_core::telegram::TelegramError) -> Self {
        AppError::Provider(e.to_string())
    }
}
