//! Error types for the REST API.
//!
//! Two distinct shapes leave this service:
//!
//! - [`ErrorResponse`] for requests rejected locally (bad JSON, shape
//!   violations, unknown routes). These never reach the upstream.
//! - [`ErrorEnvelope`] for upstream and transport failures of a forwarded
//!   call, discriminated by its `error` field.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[cfg(test)]
mod tests;

/// API error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
    /// Error code.
    pub code: String,
}

/// Discriminator of an [`ErrorEnvelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EnvelopeKind {
    /// The upstream answered with a non-2xx status.
    #[serde(rename = "IBKR API Error")]
    Upstream,
    /// The upstream could not be reached or its answer could not be read.
    #[serde(rename = "Request Error")]
    Transport,
}

/// Uniform error body for failed forwarded calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Failure kind.
    pub error: EnvelopeKind,
    /// Upstream HTTP status. Only present for upstream errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Raw upstream body, or a description of the transport failure.
    pub detail: String,
}

impl ErrorEnvelope {
    /// Envelope for a non-2xx upstream answer.
    #[must_use]
    pub fn upstream(status_code: u16, detail: impl Into<String>) -> Self {
        Self {
            error: EnvelopeKind::Upstream,
            status_code: Some(status_code),
            detail: detail.into(),
        }
    }

    /// Envelope for a call that did not complete.
    #[must_use]
    pub fn transport(detail: impl Into<String>) -> Self {
        Self {
            error: EnvelopeKind::Transport,
            status_code: None,
            detail: detail.into(),
        }
    }
}

/// Local API error types.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request body does not match the declared shape.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Request body sent without a JSON content type.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Route not found or not exposed.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// HTTP status and stable error code for this error.
    #[must_use]
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            ApiError::UnsupportedMediaType(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_MEDIA_TYPE")
            }
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::Validation(message),
            JsonRejection::MissingJsonContentType(_) => ApiError::UnsupportedMediaType(message),
            _ => ApiError::InvalidRequest(message),
        }
    }
}
