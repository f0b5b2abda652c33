//! Scanner module: iServer and HMDS market scanners.

use crate::error::ApiError;
use crate::models::{HmdsScannerRequest, ScannerSubscription};
use crate::response::ProxyResponse;
use crate::state::AppState;
use crate::upstream::{APPLICATION_XML, ResponseFormat, SCAN_TIMEOUT, UpstreamRequest};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

/// Session initialization required before any `/hmds` call.
const HMDS_AUTH_INIT: &str = "/hmds/auth/init";

/// Routes of the Scanner module.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/iserver/scanner/params", get(get_scanner_params))
        .route("/iserver/scanner/run", post(run_scanner))
        .route("/hmds/scanner", post(run_hmds_scanner))
}

/// Get scanner parameters.
///
/// Returns the XML document listing every iServer scanner parameter.
#[utoipa::path(
    get,
    path = "/iserver/scanner/params",
    responses(
        (status = 200, description = "Scanner parameters as XML, or an error envelope", content(
            (String = "application/xml"),
            (serde_json::Value = "application/json")
        ))
    ),
    tag = "Scanner"
)]
pub async fn get_scanner_params(State(state): State<Arc<AppState>>) -> ProxyResponse {
    let request = UpstreamRequest::get("/iserver/scanner/params")
        .format(ResponseFormat::Text(APPLICATION_XML));
    state.upstream.forward(request).await
}

/// Run iServer market scanner.
///
/// Returns the top contracts matching the criteria. The JSON body is
/// converted to the XML subscription the upstream expects.
#[utoipa::path(
    post,
    path = "/iserver/scanner/run",
    request_body = ScannerSubscription,
    responses(
        (status = 200, description = "Scanner results, or an `ErrorEnvelope`", body = serde_json::Value),
        (status = 422, description = "Request body does not match the subscription shape", body = crate::error::ErrorResponse)
    ),
    tag = "Scanner"
)]
pub async fn run_scanner(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ScannerSubscription>, JsonRejection>,
) -> Result<ProxyResponse, ApiError> {
    let Json(subscription) = body?;
    let request = UpstreamRequest::post("/iserver/scanner/run")
        .xml(subscription.to_xml().render())
        .timeout(SCAN_TIMEOUT);
    Ok(state.upstream.forward(request).await)
}

/// Run HMDS market scanner.
///
/// Initializes the HMDS session first; the scan is only sent if that
/// succeeds.
#[utoipa::path(
    post,
    path = "/hmds/scanner",
    request_body = HmdsScannerRequest,
    responses(
        (status = 200, description = "Scanner results, or an `ErrorEnvelope`", body = serde_json::Value),
        (status = 422, description = "Request body does not match the HMDS scanner shape", body = crate::error::ErrorResponse)
    ),
    tag = "Scanner"
)]
pub async fn run_hmds_scanner(
    State(state): State<Arc<AppState>>,
    body: Result<Json<HmdsScannerRequest>, JsonRejection>,
) -> Result<ProxyResponse, ApiError> {
    let Json(body) = body?;
    let scan = match UpstreamRequest::post("/hmds/scanner")
        .timeout(SCAN_TIMEOUT)
        .json(&body)
    {
        Ok(request) => request,
        Err(err) => return Ok(err.into()),
    };
    let init = UpstreamRequest::get(HMDS_AUTH_INIT).format(ResponseFormat::Ignore);
    Ok(state.upstream.forward_after(init, scan).await)
}
