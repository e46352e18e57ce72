//! REST API module using Axum
//!
//! Two endpoints: dream generation and a health check. Handler errors are
//! `{"error": "..."}` (see [`error::ApiError`]).

pub mod error;
pub mod handlers;
mod routes;

pub use error::ApiError;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::engine::AppContext;

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// `server.cors_origins` (or `DREAMSCAPE_CORS_ORIGINS`) lists allowed
/// origins, e.g. a local front-end dev server.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        return base;
    }

    let allowed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    tracing::info!(origins = ?origins, "CORS: allowing configured origins");
    base.allow_origin(allowed)
}

/// Create the complete application router.
pub fn create_app(ctx: AppContext, server: &ServerConfig) -> Router {
    Router::new()
        .merge(routes::api_routes(ctx))
        // Middleware
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&server.cors_origins))
}
