//! Forwarding of validated requests to the upstream gateway.
//!
//! Every proxy endpoint describes its call as an [`UpstreamRequest`] and hands
//! it to [`UpstreamClient::forward`] (or [`UpstreamClient::forward_after`] when
//! a session prerequisite is required). The client never returns an error to
//! the handler: each outcome is folded into a [`ProxyResponse`].

use crate::config::GatewayConfig;
use crate::response::{Payload, ProxyResponse};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::error::Error as StdError;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

#[cfg(test)]
mod tests;

/// Timeout for reads, writes and session initialization.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for market scans.
pub const SCAN_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON media type.
pub const APPLICATION_JSON: &str = "application/json";

/// XML media type.
pub const APPLICATION_XML: &str = "application/xml";

const USER_AGENT: &str = concat!("ibkr-gateway-proxy/", env!("CARGO_PKG_VERSION"));

/// Failure of a single upstream call.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-2xx status.
    #[error("upstream returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The call did not complete (DNS, connect, TLS, timeout, body read).
    #[error("{0}")]
    Transport(String),

    /// A 2xx body could not be decoded as JSON.
    #[error("invalid JSON in upstream response: {0}")]
    Decode(serde_json::Error),

    /// The request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Encode(serde_json::Error),
}

impl UpstreamError {
    fn transport(err: reqwest::Error) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::Transport(message)
    }
}

/// Percent-encodes `raw` as exactly one upstream path segment.
///
/// `/`, `?`, `#` and `%` are encoded so the value cannot leave its segment.
/// Returns `None` for empty, `.` and `..` values.
#[must_use]
pub fn encode_segment(raw: &str) -> Option<String> {
    if matches!(raw, "" | "." | "..") {
        return None;
    }
    let mut url = Url::parse("http://segment.invalid/").ok()?;
    url.path_segments_mut().ok()?.clear().push(raw);
    Some(url.path().trim_start_matches('/').to_string())
}

/// Outbound request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// Serialized JSON document.
    Json(Vec<u8>),
    /// Serialized XML document.
    Xml(String),
}

/// How a 2xx upstream body is returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Decode as JSON.
    Json,
    /// Pass through as text with the given media type.
    Text(&'static str),
    /// Discard the body. Used for prerequisite calls.
    Ignore,
}

/// Description of one upstream call.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    method: Method,
    path: String,
    body: RequestBody,
    timeout: Duration,
    format: ResponseFormat,
}

impl UpstreamRequest {
    /// Creates a request with no body, the default timeout and a JSON response.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            timeout: DEFAULT_TIMEOUT,
            format: ResponseFormat::Json,
        }
    }

    /// `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `DELETE` request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Sets a JSON body.
    ///
    /// # Errors
    /// Returns [`UpstreamError::Encode`] if `body` cannot be serialized.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, UpstreamError> {
        self.body = RequestBody::Json(serde_json::to_vec(body).map_err(UpstreamError::Encode)?);
        Ok(self)
    }

    /// Sets an XML body.
    #[must_use]
    pub fn xml(mut self, document: impl Into<String>) -> Self {
        self.body = RequestBody::Xml(document.into());
        self
    }

    /// Overrides the per-call timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides how a successful body is returned.
    #[must_use]
    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    /// Upstream path, relative to the configured base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request body.
    #[must_use]
    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Per-call timeout.
    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        self.timeout
    }
}

/// HTTP client for the upstream gateway.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Creates a client for the configured gateway.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        Self::build(config.base_url(), config.verify_tls)
    }

    /// Creates a client for an explicit base URL with certificate checks enabled.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::build(base_url.into(), true)
    }

    fn build(base_url: String, verify_tls: bool) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(90))
            .danger_accept_invalid_certs(!verify_tls)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL every request path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an upstream path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Performs one upstream call.
    ///
    /// # Errors
    /// Returns [`UpstreamError::Status`] for non-2xx answers,
    /// [`UpstreamError::Decode`] for undecodable JSON bodies and
    /// [`UpstreamError::Transport`] when no answer could be read.
    pub async fn execute(&self, request: &UpstreamRequest) -> Result<Payload, UpstreamError> {
        let url = self.url(&request.path);
        debug!("Forwarding {} {}", request.method, url);

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .timeout(request.timeout);
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder
                .header(CONTENT_TYPE, APPLICATION_JSON)
                .body(bytes.clone()),
            RequestBody::Xml(document) => builder
                .header(CONTENT_TYPE, APPLICATION_XML)
                .body(document.clone()),
        };

        let response = builder.send().await.map_err(|err| {
            warn!("Upstream {} {} failed: {}", request.method, url, err);
            UpstreamError::transport(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upstream {} {} returned {}", request.method, url, status);
            let body = response.text().await.map_err(|err| {
                warn!("Failed to read error body from {} {}: {}", request.method, url, err);
                UpstreamError::transport(err)
            })?;
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        match request.format {
            ResponseFormat::Ignore => Ok(Payload::Json(Value::Null)),
            ResponseFormat::Text(media_type) => {
                let body = response.text().await.map_err(UpstreamError::transport)?;
                Ok(Payload::Text { body, media_type })
            }
            ResponseFormat::Json => {
                let bytes = response.bytes().await.map_err(UpstreamError::transport)?;
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Payload::Json(Value::Null));
                }
                serde_json::from_slice(&bytes)
                    .map(Payload::Json)
                    .map_err(UpstreamError::Decode)
            }
        }
    }

    /// Performs one upstream call and normalizes the outcome.
    pub async fn forward(&self, request: UpstreamRequest) -> ProxyResponse {
        self.execute(&request).await.into()
    }

    /// Sets `body` as the JSON body of `request` and forwards it.
    pub async fn forward_json<T: Serialize>(
        &self,
        request: UpstreamRequest,
        body: &T,
    ) -> ProxyResponse {
        match request.json(body) {
            Ok(request) => self.forward(request).await,
            Err(err) => err.into(),
        }
    }

    /// Performs `prerequisite`, then `primary` only if the prerequisite succeeded.
    ///
    /// A failed prerequisite is normalized exactly like a failed primary call.
    pub async fn forward_after(
        &self,
        prerequisite: UpstreamRequest,
        primary: UpstreamRequest,
    ) -> ProxyResponse {
        if let Err(err) = self.execute(&prerequisite).await {
            warn!(
                "Prerequisite {} failed, not calling {}",
                prerequisite.path, primary.path
            );
            return err.into();
        }
        self.forward(primary).await
    }
}
