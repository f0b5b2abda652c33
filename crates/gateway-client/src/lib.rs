//! HTTP client library for the IBKR Gateway Proxy API.
//!
//! This crate provides a typed HTTP client for the proxy's REST surface.
//! Error envelopes returned by the proxy are decoded into [`Error::Upstream`]
//! and [`Error::Transport`], so callers get a plain `Result`.
//!
//! # Example
//!
//! ```no_run
//! use gateway_client::{ClientConfig, GatewayClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gateway_client::Error> {
//!     let client = GatewayClient::new(ClientConfig {
//!         base_url: "http://localhost:8000".into(),
//!         timeout: Duration::from_secs(30),
//!     })?;
//!
//!     let mta = client.get_mta_alert().await?;
//!     println!("MTA alert: {}", mta);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{ClientConfig, GatewayClient};
pub use error::Error;
pub use types::*;
