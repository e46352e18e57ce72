//! API route definitions
//!
//! - POST /generate_dream - physiology reading in, dream prompt out
//! - GET  /health         - artifact status and uptime

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::engine::AppContext;

/// Create all API routes.
pub fn api_routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/generate_dream", post(handlers::generate_dream))
        .route("/health", get(handlers::health))
        .with_state(ctx)
}
