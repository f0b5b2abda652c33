//! Unit tests for upstream module.

use super::*;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;

async fn spawn_stub(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn unused_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn echo(headers: HeaderMap, body: String) -> axum::Json<Value> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    axum::Json(json!({"content_type": content_type, "body": body}))
}

// ============================================================================
// Path Segment Tests
// ============================================================================

#[test]
fn test_encode_segment_plain_values_unchanged() {
    assert_eq!(encode_segment("U1234567").as_deref(), Some("U1234567"));
    assert_eq!(encode_segment("42").as_deref(), Some("42"));
}

#[test]
fn test_encode_segment_keeps_value_in_one_segment() {
    assert_eq!(
        encode_segment("../../order/42").as_deref(),
        Some("..%2F..%2Forder%2F42")
    );
    assert_eq!(encode_segment("a?b#c").as_deref(), Some("a%3Fb%23c"));
    assert_eq!(encode_segment("%2e%2e").as_deref(), Some("%252e%252e"));
}

#[test]
fn test_encode_segment_rejects_dot_segments() {
    assert_eq!(encode_segment(""), None);
    assert_eq!(encode_segment("."), None);
    assert_eq!(encode_segment(".."), None);
}

// ============================================================================
// UpstreamRequest Tests
// ============================================================================

#[test]
fn test_request_defaults() {
    let request = UpstreamRequest::get("/iserver/account/mta");
    assert_eq!(request.method(), &Method::GET);
    assert_eq!(request.path(), "/iserver/account/mta");
    assert_eq!(request.body(), &RequestBody::Empty);
    assert_eq!(request.call_timeout(), DEFAULT_TIMEOUT);
}

#[test]
fn test_request_json_body() {
    let request = UpstreamRequest::post("/x")
        .json(&json!({"alertId": 1}))
        .unwrap();
    assert_eq!(request.body(), &RequestBody::Json(br#"{"alertId":1}"#.to_vec()));
}

#[test]
fn test_request_timeout_override() {
    let request = UpstreamRequest::post("/iserver/scanner/run").timeout(SCAN_TIMEOUT);
    assert_eq!(request.call_timeout(), Duration::from_secs(30));
}

// ============================================================================
// UpstreamClient Tests
// ============================================================================

#[test]
fn test_client_url_joins_base_and_path() {
    let client = UpstreamClient::with_base_url("https://localhost:5000/v1/api/").unwrap();
    assert_eq!(client.base_url(), "https://localhost:5000/v1/api");
    assert_eq!(
        client.url("/iserver/account/mta"),
        "https://localhost:5000/v1/api/iserver/account/mta"
    );
}

#[test]
fn test_client_from_gateway_config() {
    let client = UpstreamClient::new(&GatewayConfig::default()).unwrap();
    assert_eq!(client.base_url(), "https://localhost:5000/v1/api");
}

#[tokio::test]
async fn test_forward_json_success_unchanged() {
    let payload = json!([{"order_id": 9, "alert_name": "IBM", "alert_active": 1}]);
    let expected = payload.clone();
    let base = spawn_stub(Router::new().route(
        "/v1/api/iserver/account/U1/alerts",
        get(move || async move { axum::Json(payload) }),
    ))
    .await;

    let client = UpstreamClient::with_base_url(format!("{}/v1/api", base)).unwrap();
    let response = client
        .forward(UpstreamRequest::get("/iserver/account/U1/alerts"))
        .await;

    assert_eq!(response, ProxyResponse::Success(Payload::Json(expected)));
}

#[tokio::test]
async fn test_forward_not_found_becomes_upstream_failure() {
    let base = spawn_stub(Router::new().route(
        "/missing",
        get(|| async { (StatusCode::NOT_FOUND, "Not Found") }),
    ))
    .await;

    let client = UpstreamClient::with_base_url(base).unwrap();
    let response = client.forward(UpstreamRequest::get("/missing")).await;

    assert_eq!(
        response,
        ProxyResponse::UpstreamFailure {
            status: 404,
            body: "Not Found".to_string()
        }
    );
}

#[tokio::test]
async fn test_forward_connection_refused_becomes_transport_failure() {
    let client = UpstreamClient::with_base_url(unused_address().await).unwrap();
    let response = client.forward(UpstreamRequest::get("/anything")).await;

    match response {
        ProxyResponse::TransportFailure(message) => assert!(!message.is_empty()),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_forward_timeout_becomes_transport_failure() {
    let base = spawn_stub(Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }),
    ))
    .await;

    let client = UpstreamClient::with_base_url(base).unwrap();
    let response = client
        .forward(UpstreamRequest::get("/slow").timeout(Duration::from_millis(100)))
        .await;

    assert!(matches!(response, ProxyResponse::TransportFailure(_)));
}

#[tokio::test]
async fn test_forward_sends_json_content_type() {
    let base = spawn_stub(Router::new().route("/echo", post(echo))).await;
    let client = UpstreamClient::with_base_url(base).unwrap();

    let request = UpstreamRequest::post("/echo")
        .json(&json!({"alertId": 5, "alertActive": 1}))
        .unwrap();
    let response = client.forward(request).await;

    let echoed = match response {
        ProxyResponse::Success(Payload::Json(echoed)) => echoed,
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(echoed["content_type"], APPLICATION_JSON);
    let sent: Value = serde_json::from_str(echoed["body"].as_str().unwrap()).unwrap();
    assert_eq!(sent, json!({"alertId": 5, "alertActive": 1}));
}

#[tokio::test]
async fn test_forward_sends_xml_content_type() {
    let base = spawn_stub(Router::new().route("/echo", post(echo))).await;
    let client = UpstreamClient::with_base_url(base).unwrap();

    let response = client
        .forward(UpstreamRequest::post("/echo").xml("<a>1</a>"))
        .await;

    let echoed = match response {
        ProxyResponse::Success(Payload::Json(echoed)) => echoed,
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(echoed["content_type"], APPLICATION_XML);
    assert_eq!(echoed["body"], "<a>1</a>");
}

#[tokio::test]
async fn test_forward_text_format() {
    let base = spawn_stub(Router::new().route(
        "/params",
        get(|| async { "<ScanParameterResponse/>" }),
    ))
    .await;
    let client = UpstreamClient::with_base_url(base).unwrap();

    let response = client
        .forward(UpstreamRequest::get("/params").format(ResponseFormat::Text(APPLICATION_XML)))
        .await;

    assert_eq!(
        response,
        ProxyResponse::Success(Payload::Text {
            body: "<ScanParameterResponse/>".to_string(),
            media_type: APPLICATION_XML,
        })
    );
}

#[tokio::test]
async fn test_forward_empty_success_body_is_null() {
    let base = spawn_stub(Router::new().route("/empty", get(|| async { StatusCode::OK }))).await;
    let client = UpstreamClient::with_base_url(base).unwrap();

    let response = client.forward(UpstreamRequest::get("/empty")).await;
    assert_eq!(response, ProxyResponse::Success(Payload::Json(Value::Null)));
}

#[tokio::test]
async fn test_forward_invalid_json_success_body() {
    let base = spawn_stub(Router::new().route("/html", get(|| async { "<html></html>" }))).await;
    let client = UpstreamClient::with_base_url(base).unwrap();

    let response = client.forward(UpstreamRequest::get("/html")).await;
    match response {
        ProxyResponse::TransportFailure(message) => {
            assert!(message.starts_with("invalid JSON in upstream response"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

// ============================================================================
// Prerequisite Tests
// ============================================================================

fn counting_router(init_status: StatusCode) -> (Router, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let init_calls = Arc::new(AtomicUsize::new(0));
    let scan_calls = Arc::new(AtomicUsize::new(0));
    let init = Arc::clone(&init_calls);
    let scan = Arc::clone(&scan_calls);

    let router = Router::new()
        .route(
            "/hmds/auth/init",
            get(move || {
                init.fetch_add(1, Ordering::SeqCst);
                async move { (init_status, "init") }
            }),
        )
        .route(
            "/hmds/scanner",
            post(move || {
                scan.fetch_add(1, Ordering::SeqCst);
                async { axum::Json(json!({"Contracts": {"Contract": []}})) }
            }),
        );
    (router, init_calls, scan_calls)
}

#[tokio::test]
async fn test_forward_after_skips_primary_when_prerequisite_fails() {
    let (router, init_calls, scan_calls) = counting_router(StatusCode::UNAUTHORIZED);
    let base = spawn_stub(router).await;
    let client = UpstreamClient::with_base_url(base).unwrap();

    let response = client
        .forward_after(
            UpstreamRequest::get("/hmds/auth/init").format(ResponseFormat::Ignore),
            UpstreamRequest::post("/hmds/scanner").timeout(SCAN_TIMEOUT),
        )
        .await;

    assert_eq!(
        response,
        ProxyResponse::UpstreamFailure {
            status: 401,
            body: "init".to_string()
        }
    );
    assert_eq!(init_calls.load(Ordering::SeqCst), 1);
    assert_eq!(scan_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_forward_after_runs_primary_when_prerequisite_succeeds() {
    let (router, init_calls, scan_calls) = counting_router(StatusCode::OK);
    let base = spawn_stub(router).await;
    let client = UpstreamClient::with_base_url(base).unwrap();

    let response = client
        .forward_after(
            UpstreamRequest::get("/hmds/auth/init").format(ResponseFormat::Ignore),
            UpstreamRequest::post("/hmds/scanner").timeout(SCAN_TIMEOUT),
        )
        .await;

    assert_eq!(
        response,
        ProxyResponse::Success(Payload::Json(json!({"Contracts": {"Contract": []}})))
    );
    assert_eq!(init_calls.load(Ordering::SeqCst), 1);
    assert_eq!(scan_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_forward_after_prerequisite_transport_failure() {
    let client = UpstreamClient::with_base_url(unused_address().await).unwrap();

    let response = client
        .forward_after(
            UpstreamRequest::get("/hmds/auth/init").format(ResponseFormat::Ignore),
            UpstreamRequest::post("/hmds/scanner"),
        )
        .await;

    assert!(matches!(response, ProxyResponse::TransportFailure(_)));
}

#[tokio::test]
async fn test_truncated_error_body_becomes_transport_failure() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;
        socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\nshort")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });
    let client = UpstreamClient::with_base_url(format!("http://{}", addr)).unwrap();

    let response = client.forward(UpstreamRequest::get("/iserver/account/mta")).await;

    assert!(matches!(response, ProxyResponse::TransportFailure(_)));
}
