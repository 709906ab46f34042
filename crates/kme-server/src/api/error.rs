//! API error types and responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kme_core::KmeError;
use serde::Serialize;
use thiserror::Error;

use crate::storage::StorageError;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request format: {0}")]
    BadRequest(String),

    #[error("ETSI API method not supported: {0}")]
    UnsupportedMethod(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("Key ID not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// API error response body
///
/// `message` is the field ETSI GS QKD 014 defines for error responses.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::UnsupportedMethod(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = match &self {
            ApiError::BadRequest(msg) => {
                ("BAD_REQUEST", format!("Bad request format: {}", msg), None)
            }
            ApiError::UnsupportedMethod(method) => (
                "UNSUPPORTED_METHOD",
                format!("ETSI API method not supported: {}", method),
                Some(serde_json::json!({
                    "supported": ["status", "enc_keys", "dec_keys"],
                })),
            ),
            ApiError::Unauthorized(msg) => ("UNAUTHORIZED", msg.clone(), None),
            ApiError::Forbidden(msg) => ("FORBIDDEN", msg.clone(), None),
            ApiError::PayloadTooLarge(msg) => ("PAYLOAD_TOO_LARGE", msg.clone(), None),
            ApiError::NotFound(key_id) => (
                "KEY_NOT_FOUND",
                "Key ID Not Found".to_string(),
                Some(serde_json::json!({ "key_ID": key_id })),
            ),
            // Store internals stay in the server log
            ApiError::Internal(_) => ("INTERNAL_ERROR", "Internal server error".to_string(), None),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorResponse {
            message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<KmeError> for ApiError {
    fn from(err: KmeError) -> Self {
        match err {
            KmeError::KeyNotFound(key_id) | KmeError::UnsupportedExtension(key_id) => {
                ApiError::NotFound(key_id)
            }
            KmeError::MasterMismatch { .. } | KmeError::NotAuthorized { .. } => {
                ApiError::Forbidden("Key not authorized for this SAE".into())
            }
            KmeError::InvalidParameter(msg) => ApiError::BadRequest(msg),
            KmeError::InvalidKeyMaterial(_)
            | KmeError::SerializationError(_)
            | KmeError::Storage(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
