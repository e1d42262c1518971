// Waypoint API library
// Decision: Shared library for binaries (API server, OpenAPI export) and HTTP tests

// API routes and types (shared for OpenAPI generation)
pub mod api;

// Server configuration
pub mod config;

// OpenAPI spec generation
pub mod openapi;

pub use api::AppState;
pub use config::ApiConfig;

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Build the application router: health (not prefixed), prefixed API routes
/// and Swagger UI
pub fn app(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(api::definitions::routes(state.clone()))
        .merge(api::instances::routes(state.clone()));

    Router::new()
        .merge(api::health::routes(state.clone()))
        .merge(build_router_with_prefix(api_routes, &state.api_prefix))
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", openapi::ApiDoc::openapi()),
        )
}

/// Build router with optional API prefix (extracted for testing)
pub fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}
