//! Integration test harness for the IBKR Gateway Proxy.
//!
//! Each test starts a stub upstream gateway and a proxy pointed at it, both
//! bound to ephemeral ports on the loopback interface. No external gateway
//! is required.

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use gateway_client::{ClientConfig, GatewayClient};
use ibkr_gateway_proxy::api::build_app;
use ibkr_gateway_proxy::state::AppState;
use ibkr_gateway_proxy::surface::Surface;
use ibkr_gateway_proxy::upstream::UpstreamClient;
use std::sync::Arc;
use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A request observed by the stub upstream.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// HTTP method.
    pub method: Method,
    /// Request path, including the upstream endpoint prefix.
    pub path: String,
    /// `Content-Type` header, empty when absent.
    pub content_type: String,
    /// Raw request body.
    pub body: String,
}

/// Shared log of calls received by a stub upstream.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<RecordedCall>>>);

impl CallLog {
    /// Appends a call and returns it.
    pub async fn record(
        &self,
        method: Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: &Bytes,
    ) -> RecordedCall {
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let call = RecordedCall {
            method,
            path: uri.path().to_string(),
            content_type,
            body: String::from_utf8_lossy(body).into_owned(),
        };
        self.0.lock().await.push(call.clone());
        call
    }

    /// Snapshot of all recorded calls, in arrival order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.0.lock().await.clone()
    }

    /// Number of calls received on `path`.
    pub async fn count(&self, path: &str) -> usize {
        self.0
            .lock()
            .await
            .iter()
            .filter(|call| call.path == path)
            .count()
    }
}

/// Reply produced by a stub upstream.
#[derive(Debug, Clone)]
pub struct StubReply {
    status: StatusCode,
    content_type: &'static str,
    body: String,
}

impl StubReply {
    /// 200 with a JSON body.
    pub fn json(value: Value) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "application/json",
            body: value.to_string(),
        }
    }

    /// 200 with an XML body.
    pub fn xml(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "application/xml",
            body: body.to_string(),
        }
    }

    /// Plain text body with an explicit status.
    pub fn status(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.to_string(),
        }
    }
}

type Responder = Arc<dyn Fn(&RecordedCall) -> StubReply + Send + Sync>;

#[derive(Clone)]
struct StubState {
    log: CallLog,
    responder: Responder,
}

async fn stub_handler(
    State(stub): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let call = stub.log.record(method, &uri, &headers, &body).await;
    let reply = (stub.responder)(&call);
    (
        reply.status,
        [(header::CONTENT_TYPE, reply.content_type)],
        reply.body,
    )
        .into_response()
}

/// Starts a stub upstream that records every call and answers with `responder`.
///
/// Returns the stub base URL and its call log.
pub async fn spawn_upstream<F>(responder: F) -> (String, CallLog)
where
    F: Fn(&RecordedCall) -> StubReply + Send + Sync + 'static,
{
    let log = CallLog::default();
    let router = Router::new().fallback(stub_handler).with_state(StubState {
        log: log.clone(),
        responder: Arc::new(responder),
    });
    (spawn_server(router).await, log)
}

/// Binds `router` on an ephemeral loopback port and serves it in the background.
///
/// Returns the `http://host:port` base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server error");
    });
    format!("http://{}", addr)
}

/// Base URL of a port nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    format!("http://{}", addr)
}

/// Starts a proxy forwarding to `upstream_base` with the given tag filters.
///
/// Returns the proxy base URL.
pub async fn spawn_proxy(
    upstream_base: &str,
    include: Option<&str>,
    exclude: Option<&str>,
) -> String {
    let surface = Surface::from_tags(include, exclude);
    let upstream = UpstreamClient::with_base_url(upstream_base).expect("Failed to build upstream");
    let app = build_app(Arc::new(AppState::new(upstream)), &surface, None);
    spawn_server(app).await
}

/// Creates a test client for a running proxy.
pub fn create_test_client(proxy_base: &str) -> GatewayClient {
    GatewayClient::new(ClientConfig {
        base_url: proxy_base.to_string(),
        timeout: Duration::from_secs(40),
    })
    .expect("Failed to create client")
}
