//! Unit tests for error module.

use super::*;

// ============================================================================
// ErrorResponse Tests
// ============================================================================

#[test]
fn test_error_response_serialization() {
    let response = ErrorResponse {
        error: "Something went wrong".to_string(),
        code: "INVALID_REQUEST".to_string(),
    };

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"error\":\"Something went wrong\""));
    assert!(json.contains("\"code\":\"INVALID_REQUEST\""));
}

// ============================================================================
// ErrorEnvelope Tests
// ============================================================================

#[test]
fn test_upstream_envelope_serialization() {
    let envelope = ErrorEnvelope::upstream(404, "Not Found");

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"error": "IBKR API Error", "status_code": 404, "detail": "Not Found"})
    );
}

#[test]
fn test_transport_envelope_has_no_status_code() {
    let envelope = ErrorEnvelope::transport("connection refused");

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["error"], "Request Error");
    assert_eq!(json["detail"], "connection refused");
    assert!(json.get("status_code").is_none());
}

#[test]
fn test_envelope_deserialization() {
    let envelope: ErrorEnvelope =
        serde_json::from_str(r#"{"error":"Request Error","detail":"timed out"}"#).unwrap();
    assert_eq!(envelope, ErrorEnvelope::transport("timed out"));

    let envelope: ErrorEnvelope =
        serde_json::from_str(r#"{"error":"IBKR API Error","status_code":500,"detail":""}"#)
            .unwrap();
    assert_eq!(envelope.error, EnvelopeKind::Upstream);
    assert_eq!(envelope.status_code, Some(500));
}

#[test]
fn test_envelope_rejects_unknown_kind() {
    let result: Result<ErrorEnvelope, _> =
        serde_json::from_str(r#"{"error":"Other","detail":"x"}"#);
    assert!(result.is_err());
}

// ============================================================================
// ApiError Display Tests
// ============================================================================

#[test]
fn test_api_error_invalid_request_display() {
    let error = ApiError::InvalidRequest("Missing required field".to_string());
    assert_eq!(
        format!("{}", error),
        "Invalid request: Missing required field"
    );
}

#[test]
fn test_api_error_validation_display() {
    let error = ApiError::Validation("missing field `alertName`".to_string());
    assert_eq!(
        format!("{}", error),
        "Validation failed: missing field `alertName`"
    );
}

#[test]
fn test_api_error_not_found_display() {
    let error = ApiError::NotFound("/nope".to_string());
    assert_eq!(format!("{}", error), "Not found: /nope");
}

// ============================================================================
// ApiError IntoResponse Tests
// ============================================================================

#[test]
fn test_api_error_invalid_request_into_response() {
    let response = ApiError::InvalidRequest("Bad input".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_api_error_validation_into_response() {
    let response = ApiError::Validation("Bad shape".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn test_api_error_unsupported_media_type_into_response() {
    let response = ApiError::UnsupportedMediaType("text/plain".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[test]
fn test_api_error_not_found_into_response() {
    let response = ApiError::NotFound("Not found".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_api_error_codes() {
    assert_eq!(
        ApiError::Validation(String::new()).status_and_code().1,
        "VALIDATION_ERROR"
    );
    assert_eq!(
        ApiError::NotFound(String::new()).status_and_code().1,
        "NOT_FOUND"
    );
}

#[test]
fn test_api_error_debug() {
    let error = ApiError::NotFound("/iserver/scanner/run".to_string());
    let debug = format!("{:?}", error);
    assert!(debug.contains("NotFound"));
    assert!(debug.contains("/iserver/scanner/run"));
}
