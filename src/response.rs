//! Normalized outcome of a proxied call.

use crate::error::ErrorEnvelope;
use crate::upstream::UpstreamError;
use axum::Json;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

/// A successful upstream body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Decoded JSON document, returned unchanged.
    Json(Value),
    /// Raw text returned with an explicit media type.
    Text {
        /// Body text.
        body: String,
        /// Media type sent to the caller.
        media_type: &'static str,
    },
}

/// Outcome of a proxied call. Every variant renders to a response.
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyResponse {
    /// 2xx upstream answer.
    Success(Payload),
    /// Non-2xx upstream answer.
    UpstreamFailure {
        /// Upstream HTTP status.
        status: u16,
        /// Raw upstream body.
        body: String,
    },
    /// The call did not complete.
    TransportFailure(String),
}

impl ProxyResponse {
    /// Returns true for [`ProxyResponse::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ProxyResponse::Success(_))
    }

    /// The error envelope for failed outcomes.
    #[must_use]
    pub fn envelope(&self) -> Option<ErrorEnvelope> {
        match self {
            ProxyResponse::Success(_) => None,
            ProxyResponse::UpstreamFailure { status, body } => {
                Some(ErrorEnvelope::upstream(*status, body.clone()))
            }
            ProxyResponse::TransportFailure(message) => {
                Some(ErrorEnvelope::transport(message.clone()))
            }
        }
    }
}

impl From<UpstreamError> for ProxyResponse {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { status, body } => {
                ProxyResponse::UpstreamFailure { status, body }
            }
            other => ProxyResponse::TransportFailure(other.to_string()),
        }
    }
}

impl From<Result<Payload, UpstreamError>> for ProxyResponse {
    fn from(result: Result<Payload, UpstreamError>) -> Self {
        match result {
            Ok(payload) => ProxyResponse::Success(payload),
            Err(err) => err.into(),
        }
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        match self {
            ProxyResponse::Success(Payload::Json(value)) => Json(value).into_response(),
            ProxyResponse::Success(Payload::Text { body, media_type }) => {
                ([(header::CONTENT_TYPE, media_type)], body).into_response()
            }
            ProxyResponse::UpstreamFailure { status, body } => {
                Json(ErrorEnvelope::upstream(status, body)).into_response()
            }
            ProxyResponse::TransportFailure(message) => {
                Json(ErrorEnvelope::transport(message)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnvelopeKind;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_from_status_error() {
        let response: ProxyResponse = UpstreamError::Status {
            status: 404,
            body: "no such account".to_string(),
        }
        .into();
        assert_eq!(
            response,
            ProxyResponse::UpstreamFailure {
                status: 404,
                body: "no such account".to_string()
            }
        );
    }

    #[test]
    fn test_from_transport_error() {
        let response: ProxyResponse = UpstreamError::Transport("connection refused".into()).into();
        assert_eq!(
            response,
            ProxyResponse::TransportFailure("connection refused".to_string())
        );
    }

    #[test]
    fn test_from_decode_error_is_transport_failure() {
        let err = serde_json::from_str::<Value>("not json").unwrap_err();
        let response: ProxyResponse = UpstreamError::Decode(err).into();
        match response {
            ProxyResponse::TransportFailure(message) => {
                assert!(message.starts_with("invalid JSON in upstream response"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_envelope_kinds() {
        assert_eq!(ProxyResponse::Success(Payload::Json(Value::Null)).envelope(), None);

        let upstream = ProxyResponse::UpstreamFailure {
            status: 500,
            body: "boom".to_string(),
        }
        .envelope()
        .unwrap();
        assert_eq!(upstream.error, EnvelopeKind::Upstream);
        assert_eq!(upstream.status_code, Some(500));

        let transport = ProxyResponse::TransportFailure("dns".to_string())
            .envelope()
            .unwrap();
        assert_eq!(transport.error, EnvelopeKind::Transport);
        assert_eq!(transport.status_code, None);
    }

    #[tokio::test]
    async fn test_success_json_passes_through() {
        let payload = json!([{"order_id": 1, "alert_name": "x"}]);
        let response = ProxyResponse::Success(Payload::Json(payload.clone())).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, payload);
    }

    #[tokio::test]
    async fn test_success_text_sets_media_type() {
        let response = ProxyResponse::Success(Payload::Text {
            body: "<ScanParameterResponse/>".to_string(),
            media_type: "application/xml",
        })
        .into_response();

        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/xml"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<ScanParameterResponse/>");
    }

    #[tokio::test]
    async fn test_upstream_failure_renders_envelope() {
        let response = ProxyResponse::UpstreamFailure {
            status: 404,
            body: "Not Found".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"error": "IBKR API Error", "status_code": 404, "detail": "Not Found"})
        );
    }

    #[tokio::test]
    async fn test_transport_failure_renders_envelope_without_status() {
        let response = ProxyResponse::TransportFailure("connection refused".to_string())
            .into_response();

        let body = body_json(response).await;
        assert_eq!(body["error"], "Request Error");
        assert_eq!(body["detail"], "connection refused");
        assert!(body.get("status_code").is_none());
    }
}
