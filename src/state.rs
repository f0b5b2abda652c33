//! Application state management.

use crate::config::Config;
use crate::upstream::UpstreamClient;

/// Application state shared across all handlers.
///
/// Holds no mutable data: every request is forwarded independently.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Client for the upstream gateway.
    pub upstream: UpstreamClient,
}

impl AppState {
    /// Creates a new application state around an upstream client.
    #[must_use]
    pub fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    /// Creates a new application state from configuration.
    ///
    /// # Errors
    /// Returns error if the upstream HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(UpstreamClient::new(&config.gateway)?))
    }
}
