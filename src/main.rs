//! IBKR Gateway Proxy Server
//!
//! Filtered REST proxy for the Interactive Brokers Client Portal Web API.

use anyhow::Context;
use ibkr_gateway_proxy::api::build_app;
use ibkr_gateway_proxy::catalog::Capability;
use ibkr_gateway_proxy::config::Config;
use ibkr_gateway_proxy::state::AppState;
use ibkr_gateway_proxy::surface::Surface;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from a TOML file when CONFIG_PATH is set
    let config = match std::env::var("CONFIG_PATH") {
        Ok(path) => Config::load(&path).with_context(|| format!("loading {}", path))?,
        Err(_) => Config::from_env().context("loading configuration from environment")?,
    };

    // Compute the visible surface once
    let surface = Surface::from_tags(
        config.surface.included_tags.as_deref(),
        config.surface.excluded_tags.as_deref(),
    );
    let names: Vec<&str> = surface.modules().iter().map(Capability::name).collect();
    if names.is_empty() {
        warn!("No modules are visible; only /health will be served");
    } else {
        info!("Visible modules: {}", names.join(", "));
    }

    if !config.gateway.verify_tls {
        warn!("Upstream TLS certificate verification is disabled");
    }

    let state = Arc::new(AppState::from_config(&config)?);
    info!("Forwarding to {}", state.upstream.base_url());

    let app = build_app(state, &surface, config.server.public_url.as_deref());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
