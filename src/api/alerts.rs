//! Alerts module: price, time, margin and MTA alerts.

use crate::error::ApiError;
use crate::models::{AlertActivationRequest, AlertRequest};
use crate::response::ProxyResponse;
use crate::state::AppState;
use crate::upstream::{UpstreamRequest, encode_segment};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use std::sync::Arc;

/// Routes of the Alerts module.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/iserver/account/{accountId}/alerts", get(get_alerts))
        .route(
            "/iserver/account/{accountId}/alert",
            post(create_or_modify_alert),
        )
        .route(
            "/iserver/account/{accountId}/alert/{alertId}",
            delete(delete_alert),
        )
        .route("/iserver/account/mta", get(get_mta_alert))
        .route(
            "/iserver/account/alert/activate",
            post(activate_deactivate_alert),
        )
}

/// Encodes a path parameter as a single upstream path segment.
fn segment(name: &str, raw: &str) -> Result<String, ApiError> {
    encode_segment(raw)
        .ok_or_else(|| ApiError::InvalidRequest(format!("invalid {}: {:?}", name, raw)))
}

/// Get alerts.
///
/// Returns a list of alerts for the specified account.
#[utoipa::path(
    get,
    path = "/iserver/account/{accountId}/alerts",
    params(
        ("accountId" = String, Path, description = "The account ID")
    ),
    responses(
        (status = 200, description = "Upstream alert list, or an `ErrorEnvelope`", body = serde_json::Value),
        (status = 400, description = "Path parameter is not a single segment", body = crate::error::ErrorResponse)
    ),
    tag = "Alerts"
)]
pub async fn get_alerts(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> Result<ProxyResponse, ApiError> {
    let account_id = segment("accountId", &account_id)?;
    Ok(state
        .upstream
        .forward(UpstreamRequest::get(format!(
            "/iserver/account/{}/alerts",
            account_id
        )))
        .await)
}

/// Create or modify alert.
///
/// Creates a new alert, or modifies an existing one when `orderId` is present.
#[utoipa::path(
    post,
    path = "/iserver/account/{accountId}/alert",
    params(
        ("accountId" = String, Path, description = "The account ID")
    ),
    request_body = AlertRequest,
    responses(
        (status = 200, description = "Upstream confirmation, or an `ErrorEnvelope`", body = serde_json::Value),
        (status = 400, description = "Malformed JSON or path parameter", body = crate::error::ErrorResponse),
        (status = 422, description = "Request body does not match the alert shape", body = crate::error::ErrorResponse)
    ),
    tag = "Alerts"
)]
pub async fn create_or_modify_alert(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
    body: Result<Json<AlertRequest>, JsonRejection>,
) -> Result<ProxyResponse, ApiError> {
    let account_id = segment("accountId", &account_id)?;
    let Json(body) = body?;
    let request = UpstreamRequest::post(format!("/iserver/account/{}/alert", account_id));
    Ok(state.upstream.forward_json(request, &body).await)
}

/// Delete alert.
///
/// Deletes a single alert for the given account.
#[utoipa::path(
    delete,
    path = "/iserver/account/{accountId}/alert/{alertId}",
    params(
        ("accountId" = String, Path, description = "The account ID"),
        ("alertId" = String, Path, description = "The ID of the alert to delete")
    ),
    responses(
        (status = 200, description = "Upstream confirmation, or an `ErrorEnvelope`", body = serde_json::Value),
        (status = 400, description = "Path parameter is not a single segment", body = crate::error::ErrorResponse)
    ),
    tag = "Alerts"
)]
pub async fn delete_alert(
    State(state): State<Arc<AppState>>,
    Path((account_id, alert_id)): Path<(String, String)>,
) -> Result<ProxyResponse, ApiError> {
    let account_id = segment("accountId", &account_id)?;
    let alert_id = segment("alertId", &alert_id)?;
    Ok(state
        .upstream
        .forward(UpstreamRequest::delete(format!(
            "/iserver/account/{}/alert/{}",
            account_id, alert_id
        )))
        .await)
}

/// Get MTA alert.
///
/// Each login user has a unique Mobile Trading Assistant (MTA) alert.
#[utoipa::path(
    get,
    path = "/iserver/account/mta",
    responses(
        (status = 200, description = "The MTA alert, or an `ErrorEnvelope`", body = serde_json::Value)
    ),
    tag = "Alerts"
)]
pub async fn get_mta_alert(State(state): State<Arc<AppState>>) -> ProxyResponse {
    state
        .upstream
        .forward(UpstreamRequest::get("/iserver/account/mta"))
        .await
}

/// Activate or deactivate alert.
#[utoipa::path(
    post,
    path = "/iserver/account/alert/activate",
    request_body = AlertActivationRequest,
    responses(
        (status = 200, description = "Upstream confirmation, or an `ErrorEnvelope`", body = serde_json::Value),
        (status = 422, description = "Request body does not match the activation shape", body = crate::error::ErrorResponse)
    ),
    tag = "Alerts"
)]
pub async fn activate_deactivate_alert(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AlertActivationRequest>, JsonRejection>,
) -> Result<ProxyResponse, ApiError> {
    let Json(body) = body?;
    let request = UpstreamRequest::post("/iserver/account/alert/activate");
    Ok(state.upstream.forward_json(request, &body).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_encodes_separators() {
        assert_eq!(segment("alertId", "1/2").unwrap(), "1%2F2");
    }

    #[test]
    fn test_segment_rejects_dot_segments() {
        for raw in ["..", ".", ""] {
            let err = segment("alertId", raw).unwrap_err();
            assert!(matches!(err, ApiError::InvalidRequest(_)));
            assert_eq!(err.status_and_code().1, "INVALID_REQUEST");
        }
    }
}
