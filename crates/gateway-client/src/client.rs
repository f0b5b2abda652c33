//! HTTP client for the gateway proxy API.

use crate::error::Error;
use crate::types::*;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Duration;
use url::Url;


/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the proxy (e.g., "http://localhost:8000").
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the IBKR Gateway Proxy API.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Url::parse(&config.base_url)?;
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a new client with default configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    /// Base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Performs a health check.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn health_check(&self) -> Result<HealthResponse, Error> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        let value = self.handle_response(resp).await?;
        Ok(serde_json::from_value(value)?)
    }

    // ========================================================================
    // Alerts
    // ========================================================================

    /// Lists alerts for an account.
    ///
    /// # Errors
    /// Returns error if the request fails or the proxy returns an error envelope.
    pub async fn get_alerts(&self, account_id: &str) -> Result<Value, Error> {
        let url = format!(
            "{}/iserver/account/{}/alerts",
            self.base_url,
            encode_segment(account_id)?
        );
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    /// Creates an alert, or modifies one when `order_id` is set.
    ///
    /// # Errors
    /// Returns error if the request fails or the proxy returns an error envelope.
    pub async fn create_or_modify_alert(
        &self,
        account_id: &str,
        request: &AlertRequest,
    ) -> Result<Value, Error> {
        let url = format!(
            "{}/iserver/account/{}/alert",
            self.base_url,
            encode_segment(account_id)?
        );
        let resp = self.client.post(&url).json(request).send().await?;
        self.handle_response(resp).await
    }

    /// Deletes an alert.
    ///
    /// # Errors
    /// Returns error if the request fails or the proxy returns an error envelope.
    pub async fn delete_alert(&self, account_id: &str, alert_id: &str) -> Result<Value, Error> {
        let url = format!(
            "{}/iserver/account/{}/alert/{}",
            self.base_url,
            encode_segment(account_id)?,
            encode_segment(alert_id)?
        );
        let resp = self.client.delete(&url).send().await?;
        self.handle_response(resp).await
    }

    /// Gets the Mobile Trading Assistant alert.
    ///
    /// # Errors
    /// Returns error if the request fails or the proxy returns an error envelope.
    pub async fn get_mta_alert(&self) -> Result<Value, Error> {
        let url = format!("{}/iserver/account/mta", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    /// Activates or deactivates an alert.
    ///
    /// # Errors
    /// Returns error if the request fails or the proxy returns an error envelope.
    pub async fn set_alert_active(
        &self,
        request: &AlertActivationRequest,
    ) -> Result<Value, Error> {
        let url = format!("{}/iserver/account/alert/activate", self.base_url);
        let resp = self.client.post(&url).json(request).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Scanner
    // ========================================================================

    /// Gets the iServer scanner parameters as raw XML.
    ///
    /// # Errors
    /// Returns error if the request fails or the proxy returns an error envelope.
    pub async fn get_scanner_params(&self) -> Result<String, Error> {
        let url = format!("{}/iserver/scanner/params", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_text_response(resp).await
    }

    /// Runs an iServer market scanner.
    ///
    /// # Errors
    /// Returns error if the request fails or the proxy returns an error envelope.
    pub async fn run_scanner(&self, subscription: &ScannerSubscription) -> Result<Value, Error> {
        let url = format!("{}/iserver/scanner/run", self.base_url);
        let resp = self.client.post(&url).json(subscription).send().await?;
        self.handle_response(resp).await
    }

    /// Runs an HMDS market scanner.
    ///
    /// # Errors
    /// Returns error if the request fails or the proxy returns an error envelope.
    pub async fn run_hmds_scanner(&self, request: &HmdsScannerRequest) -> Result<Value, Error> {
        let url = format!("{}/hmds/scanner", self.base_url);
        let resp = self.client.post(&url).json(request).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();

        if status.is_success() {
            let bytes = resp.bytes().await?;
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes)?
            };
            reject_envelope(value)
        } else {
            Err(status_error(status.as_u16(), resp).await)
        }
    }

    async fn handle_text_response(&self, resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(status.as_u16(), resp).await);
        }

        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));
        let text = resp.text().await?;
        if is_json {
            reject_envelope(serde_json::from_str(&text)?)?;
        }
        Ok(text)
    }
}

/// Percent-encodes `raw` as exactly one path segment.
pub(crate) fn encode_segment(raw: &str) -> Result<String, Error> {
    if matches!(raw, "" | "." | "..") {
        return Err(Error::InvalidPathSegment(raw.to_string()));
    }
    let mut url = Url::parse("http://segment.invalid/")?;
    url.path_segments_mut()
        .map_err(|()| Error::InvalidPathSegment(raw.to_string()))?
        .clear()
        .push(raw);
    Ok(url.path().trim_start_matches('/').to_string())
}

/// Converts an error envelope into the matching [`Error`]; passes anything else through.
pub(crate) fn reject_envelope(value: Value) -> Result<Value, Error> {
    match ErrorEnvelope::detect(&value) {
        Some(ErrorEnvelope {
            error: EnvelopeKind::Upstream,
            status_code,
            detail,
        }) => Err(Error::Upstream {
            status: status_code.unwrap_or_default(),
            detail,
        }),
        Some(ErrorEnvelope {
            error: EnvelopeKind::Transport,
            detail,
            ..
        }) => Err(Error::Transport(detail)),
        None => Ok(value),
    }
}

async fn status_error(status: u16, resp: reqwest::Response) -> Error {
    let text = resp.text().await.unwrap_or_default();
    if status == 404 {
        Error::NotFound(text)
    } else {
        Error::Api {
            status,
            message: text,
        }
    }
}
