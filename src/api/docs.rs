//! OpenAPI documentation assembled from the visible surface.

use crate::api::{alerts, handlers, scanner};
use crate::catalog::{Capability, Module};
use crate::error::{EnvelopeKind, ErrorEnvelope, ErrorResponse};
use crate::models::{
    AlertActivationRequest, AlertCondition, AlertRequest, HealthResponse, HmdsScannerRequest,
    ScannerFilter, ScannerSubscription,
};
use crate::surface::Surface;
use utoipa::OpenApi;
use utoipa::openapi::server::Server;
use utoipa::openapi::tag::{Tag, TagBuilder};

/// Documentation shared by every surface.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::health_check),
    components(schemas(HealthResponse, ErrorResponse, ErrorEnvelope, EnvelopeKind)),
    info(
        title = "IBKR Gateway Proxy API",
        version = "0.1.0",
        license(name = "MIT"),
        contact(name = "Joaquin Bejar", email = "jb@taunais.com")
    )
)]
struct BaseDoc;

/// Alerts module documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        alerts::get_alerts,
        alerts::create_or_modify_alert,
        alerts::delete_alert,
        alerts::get_mta_alert,
        alerts::activate_deactivate_alert,
    ),
    components(schemas(AlertRequest, AlertCondition, AlertActivationRequest))
)]
struct AlertsDoc;

/// Scanner module documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        scanner::get_scanner_params,
        scanner::run_scanner,
        scanner::run_hmds_scanner,
    ),
    components(schemas(ScannerSubscription, ScannerFilter, HmdsScannerRequest))
)]
struct ScannerDoc;

fn tag(name: &str, description: &str) -> Tag {
    TagBuilder::new()
        .name(name)
        .description(Some(description))
        .build()
}

/// Builds the OpenAPI document for `surface`.
///
/// The description is the rendered module list, the tags are the visible
/// modules, and only visible modules contribute paths.
#[must_use]
pub fn api_doc(surface: &Surface, public_url: Option<&str>) -> utoipa::openapi::OpenApi {
    let mut doc = BaseDoc::openapi();

    for module in surface.modules() {
        match module {
            Module::Alerts => doc.merge(AlertsDoc::openapi()),
            Module::Scanner => doc.merge(ScannerDoc::openapi()),
            _ => {}
        }
    }

    doc.info.description = Some(surface.render_description());

    let mut tags = vec![tag("Health", "Health check endpoints")];
    tags.extend(
        surface
            .modules()
            .iter()
            .map(|module| tag(module.name(), module.description())),
    );
    doc.tags = Some(tags);

    if let Some(url) = public_url {
        doc.servers = Some(vec![Server::new(url)]);
    }

    doc
}
