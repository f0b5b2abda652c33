//! # IBKR Gateway Proxy - Filtered REST Surface
//!
//! A typed, filtered REST proxy in front of the Interactive Brokers Client
//! Portal Web API. Built with [Axum](https://crates.io/crates/axum) for async
//! HTTP handling and [reqwest](https://crates.io/crates/reqwest) for upstream
//! calls, with OpenAPI/Swagger documentation via
//! [utoipa](https://crates.io/crates/utoipa).
//!
//! ## Key Features
//!
//! - **Surface Filtering**: The exposed modules are computed once at startup
//!   from `INCLUDED_TAGS` / `EXCLUDED_TAGS`. Hidden modules have no routes and
//!   no documentation.
//!
//! - **Typed Requests**: Every write validates its body before anything is
//!   sent upstream. Absent optional fields are omitted, never sent as `null`.
//!
//! - **Format Translation**: Scanner subscriptions are accepted as JSON and
//!   forwarded as the XML document the upstream requires.
//!
//! - **Session Prerequisites**: HMDS scans initialize the HMDS session first
//!   and stop there if it fails.
//!
//! - **Uniform Errors**: Upstream and transport failures are returned as a
//!   single envelope instead of raw faults.
//!
//! ## Architecture
//!
//! ```text
//! request → shape validation → (JSON→XML)? → (prerequisite)? → upstream call
//!         → payload | {error, status_code?, detail}
//! ```
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Route handlers, router and OpenAPI assembly |
//! | [`catalog`] | Closed catalog of upstream capability groups |
//! | [`config`] | Environment and TOML configuration |
//! | [`error`] | Local API errors and the error envelope |
//! | [`models`] | Request DTOs with OpenAPI schemas |
//! | [`response`] | Normalized outcome of a proxied call |
//! | [`state`] | Application state |
//! | [`surface`] | Visible module computation and description rendering |
//! | [`upstream`] | Upstream HTTP client and request builder |
//! | [`xml`] | XML tree builder |
//!
//! ## API Endpoints
//!
//! ### Alerts
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/iserver/account/{accountId}/alerts` | List alerts |
//! | POST | `/iserver/account/{accountId}/alert` | Create or modify alert |
//! | DELETE | `/iserver/account/{accountId}/alert/{alertId}` | Delete alert |
//! | GET | `/iserver/account/mta` | Get MTA alert |
//! | POST | `/iserver/account/alert/activate` | Activate or deactivate alert |
//!
//! ### Scanner
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/iserver/scanner/params` | Scanner parameters (XML) |
//! | POST | `/iserver/scanner/run` | Run iServer scanner |
//! | POST | `/hmds/scanner` | Run HMDS scanner |
//!
//! ## Example Usage
//!
//! ```bash
//! MCP_SERVER_PORT=8000 \
//! GATEWAY_INTERNAL_BASE_URL=https://localhost GATEWAY_PORT=5000 GATEWAY_ENDPOINT=/v1/api \
//! INCLUDED_TAGS="Alerts,Scanner" \
//! cargo run
//!
//! curl http://localhost:8000/iserver/account/mta
//! ```
//!
//! Swagger UI is served at `/swagger-ui/`.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod response;
pub mod state;
pub mod surface;
pub mod upstream;
pub mod xml;
