//! Axum router configuration.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use oascat_core::Registry;
use tower_http::cors::CorsLayer;

use super::{catalog, specs};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    /// Base for absolute links, without a trailing slash.
    pub public_url: String,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, public_url: impl Into<String>) -> Self {
        Self {
            registry,
            public_url: public_url.into(),
        }
    }
}

/// Create the catalog router with all routes.
pub fn create_router(state: AppState, cors: bool) -> Router {
    let router = Router::new()
        // Catalog
        .route("/", get(catalog::list_collections))
        .route("/health", get(catalog::health_check))
        .route("/specs", get(catalog::list_specifications))
        .route("/refresh", post(catalog::refresh))
        // Single spec
        .route("/{slug}/openapi.json", get(specs::get_spec_json))
        .route("/{slug}/openapi.yaml", get(specs::get_spec_yaml))
        .route("/{slug}/download", get(specs::download_spec))
        .route("/{slug}/info", get(specs::get_spec_info))
        .with_state(state);

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
