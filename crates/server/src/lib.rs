// Source Cooperative session service library
// Decision: Shared library for binaries (API server, OpenAPI export)

// API routes and types (shared with the OpenAPI export)
pub mod api;

// Session resolution and extractors
pub mod auth;

pub mod config;

// OpenAPI document
pub mod openapi;

// Redirect-only page routes
pub mod pages;

use axum::http::{header, Method};
use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::ApiState;
use crate::config::ServerConfig;
use crate::openapi::ApiDoc;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    Json(ApiDoc::openapi())
}

/// Build the full application router
pub fn build_app(state: ApiState, config: &ServerConfig) -> Router {
    let api_routes = Router::new()
        .merge(api::whoami::routes(state.auth.clone()))
        .merge(api::products::routes(state.clone()))
        .merge(api::accounts::routes(state.clone()))
        .route("/openapi", get(openapi_json));

    // Health and pages are not prefixed
    let app = Router::new()
        .route("/health", get(health))
        .merge(pages::routes(state))
        .merge(build_router_with_prefix(api_routes, &config.api_prefix));

    let app = if config.cors_origins.is_empty() {
        app
    } else {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.cors_origins.clone()))
                .allow_methods([Method::GET, Method::PUT, Method::OPTIONS])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                    header::CACHE_CONTROL,
                ])
                .allow_credentials(true),
        )
    };

    app.layer(TraceLayer::new_for_http())
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
