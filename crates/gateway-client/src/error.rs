//! Error types for the gateway client.

use thiserror::Error;


/// Client error types.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request to the proxy failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Path parameter cannot be sent as a single path segment.
    #[error("Invalid path segment: {0:?}")]
    InvalidPathSegment(String),

    /// The upstream gateway answered with a non-2xx status.
    #[error("Upstream error ({status}): {detail}")]
    Upstream {
        /// Upstream HTTP status code.
        status: u16,
        /// Raw upstream body.
        detail: String,
    },

    /// The proxy could not reach the upstream gateway.
    #[error("Upstream unreachable: {0}")]
    Transport(String),

    /// The proxy rejected the request itself.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the proxy.
        message: String,
    },

    /// Route not found or module not exposed.
    #[error("Not found: {0}")]
    NotFound(String),
}
