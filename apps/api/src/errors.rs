use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::leads::store::StoreError;
use crate::llm_client::LlmError;

/// Shown when a zero-row extraction follows an otherwise successful search.
pub const EMPTY_RESULT_MESSAGE: &str =
    "No results returned. Try another service/city, or increase count.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is terminal for the request that produced it; nothing here
/// is retried.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    /// No generation-service credential is configured.
    #[error("Generation service is not configured (missing GEMINI_API_KEY)")]
    Configuration,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("No records extracted from an otherwise successful response")]
    EmptyResult,

    #[error("Busy: {0}")]
    Busy(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// The standard "missing required fields" rejection.
    pub fn missing_fields(details: Value) -> Self {
        AppError::Validation {
            message: "Missing required fields".to_string(),
            details: Some(details),
        }
    }

    /// Wraps a generation failure, keeping the upstream's message when it is
    /// non-empty and `fallback` otherwise.
    pub fn upstream(err: LlmError, fallback: &str) -> Self {
        let message = err.upstream_message();
        if message.trim().is_empty() {
            AppError::Upstream(fallback.to_string())
        } else {
            AppError::Upstream(message)
        }
    }

    /// The text a user-facing layer should display for this error.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation { message, .. } => message.clone(),
            AppError::Upstream(msg) => msg.clone(),
            AppError::EmptyResult => EMPTY_RESULT_MESSAGE.to_string(),
            AppError::Busy(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Configuration | AppError::Storage(_) | AppError::Internal(_) => {
                "An internal server error occurred".to_string()
            }
        }
    }
}

/// Malformed or mistyped JSON bodies render like any other validation error.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation {
            message: "Invalid request body".to_string(),
            details: Some(json!({ "reason": rejection.body_text() })),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Configuration => {
                tracing::error!("{self}");
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
            }
            AppError::EmptyResult => (StatusCode::UNPROCESSABLE_ENTITY, "EMPTY_RESULT"),
            AppError::Busy(_) => (StatusCode::CONFLICT, "BUSY"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let mut body = json!({
            "error": self.user_message(),
            "code": code,
        });
        if let AppError::Validation {
            details: Some(details),
            ..
        } = &self
        {
            body["details"] = details.clone();
        }

        (status, Json(body)).into_response()
    }
}
