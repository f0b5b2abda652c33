//! Route configuration.

use crate::api::{alerts, handlers, scanner};
use crate::catalog::Module;
use crate::state::AppState;
use crate::surface::Surface;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tracing::info;

/// Creates the API router.
///
/// Only modules visible on `surface` get their routes registered; requests
/// to hidden routes fall through to the JSON `NOT_FOUND` fallback.
pub fn create_router(state: Arc<AppState>, surface: &Surface) -> Router {
    let mut router = Router::new()
        // Health check
        .route("/health", get(handlers::health_check));

    for module in surface.modules() {
        let module_routes = match module {
            Module::Alerts => alerts::routes(),
            Module::Scanner => scanner::routes(),
            _ => continue,
        };
        info!("Registering routes for module {}", module);
        router = router.merge(module_routes);
    }

    router.fallback(handlers::not_found).with_state(state)
}
