//! Configuration loading from the environment or a TOML file.
//!
//! Environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `MCP_SERVER_HOST` | `0.0.0.0` | Listen address |
//! | `MCP_SERVER_PORT` | required | Listen port |
//! | `MCP_SERVER_BASE_URL` | unset | Public URL advertised in the OpenAPI document |
//! | `GATEWAY_INTERNAL_BASE_URL` | `https://localhost` | Upstream scheme and host |
//! | `GATEWAY_PORT` | `5000` | Upstream port |
//! | `GATEWAY_ENDPOINT` | `/v1/api` | Upstream path prefix |
//! | `GATEWAY_VERIFY_TLS` | `false` | Verify the upstream certificate |
//! | `INCLUDED_TAGS` | unset | Comma separated modules to expose |
//! | `EXCLUDED_TAGS` | unset | Comma separated modules to hide |

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Required environment variable is not set.
    #[error("{0} environment variable is not set")]
    MissingVar(&'static str),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Listen configuration.
    pub server: ServerConfig,
    /// Upstream gateway configuration.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Module filtering.
    #[serde(default)]
    pub surface: SurfaceConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
    /// Public base URL advertised in the OpenAPI document.
    #[serde(default)]
    pub public_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Upstream gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Scheme and host, e.g. `https://localhost`.
    pub internal_base_url: String,
    /// Upstream port.
    pub port: u16,
    /// Path prefix, e.g. `/v1/api`.
    pub endpoint: String,
    /// Whether to verify the upstream TLS certificate.
    pub verify_tls: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            internal_base_url: "https://localhost".to_string(),
            port: 5000,
            endpoint: "/v1/api".to_string(),
            verify_tls: false,
        }
    }
}

impl GatewayConfig {
    /// Base URL every upstream path is appended to.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!(
            "{}:{}{}",
            self.internal_base_url.trim_end_matches('/'),
            self.port,
            self.endpoint.trim_end_matches('/')
        )
    }
}

/// Raw include/exclude tag lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SurfaceConfig {
    /// Modules to expose. Unset or empty exposes the whole catalog.
    #[serde(default)]
    pub included_tags: Option<String>,
    /// Modules to hide.
    #[serde(default)]
    pub excluded_tags: Option<String>,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from process environment variables.
    ///
    /// # Errors
    /// Returns error if `MCP_SERVER_PORT` is missing or any value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns error if `MCP_SERVER_PORT` is missing or any value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("MCP_SERVER_PORT")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar("MCP_SERVER_PORT"))?;
        let port = parse_port("MCP_SERVER_PORT", &port)?;

        let mut gateway = GatewayConfig::default();
        if let Some(url) = lookup("GATEWAY_INTERNAL_BASE_URL") {
            gateway.internal_base_url = url;
        }
        if let Some(gateway_port) = lookup("GATEWAY_PORT") {
            gateway.port = parse_port("GATEWAY_PORT", &gateway_port)?;
        }
        if let Some(endpoint) = lookup("GATEWAY_ENDPOINT") {
            gateway.endpoint = endpoint;
        }
        if let Some(verify) = lookup("GATEWAY_VERIFY_TLS") {
            gateway.verify_tls = parse_bool("GATEWAY_VERIFY_TLS", &verify)?;
        }

        let config = Config {
            server: ServerConfig {
                host: lookup("MCP_SERVER_HOST").unwrap_or_else(default_host),
                port,
                public_url: lookup("MCP_SERVER_BASE_URL").filter(|v| !v.is_empty()),
            },
            gateway,
            surface: SurfaceConfig {
                included_tags: lookup("INCLUDED_TAGS"),
                excluded_tags: lookup("EXCLUDED_TAGS"),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.is_empty() {
            return Err(ConfigError::InvalidValue(
                "server host cannot be empty".to_string(),
            ));
        }

        let base = &self.gateway.internal_base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(format!(
                "gateway base URL must start with http:// or https://: {}",
                base
            )));
        }

        let endpoint = &self.gateway.endpoint;
        if !endpoint.is_empty() && !endpoint.starts_with('/') {
            return Err(ConfigError::InvalidValue(format!(
                "gateway endpoint must start with '/': {}",
                endpoint
            )));
        }

        Ok(())
    }
}

fn parse_port(name: &str, raw: &str) -> Result<u16, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(format!("{} must be a valid integer", name)))
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue(format!(
            "{} must be a boolean",
            name
        ))),
    }
}
