//! HTTP surface: routes, handlers and OpenAPI documentation.

pub mod alerts;
pub mod docs;
pub mod handlers;
pub mod routes;
pub mod scanner;

pub use docs::api_doc;
pub use routes::create_router;

use crate::state::AppState;
use crate::surface::Surface;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the complete application: visible routes, Swagger UI, CORS and
/// request tracing.
pub fn build_app(state: Arc<AppState>, surface: &Surface, public_url: Option<&str>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_router(state, surface)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api_doc(surface, public_url)),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
