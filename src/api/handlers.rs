//! Request handlers.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use super::error::ApiError;
use crate::engine::{AppContext, DreamResponse};
use crate::features::parse_sample;

/// `POST /generate_dream`
///
/// The body is read raw so every payload problem, including a missing key,
/// is reported as 400 with the parser's message.
pub async fn generate_dream(
    State(ctx): State<AppContext>,
    body: Bytes,
) -> Result<Json<DreamResponse>, ApiError> {
    let Some(engine) = ctx.engine() else {
        return Err(ApiError::ModelNotLoaded);
    };

    let sample = parse_sample(&body).map_err(|e| {
        warn!(error = %e, "Rejected physiology payload");
        ApiError::from(e)
    })?;

    let response = engine.generate(&sample).map_err(|e| {
        warn!(error = %e, "Dream generation failed");
        ApiError::from(e)
    })?;

    debug!(prompt = %response.prompt, "Generated dream prompt");
    Ok(Json(response))
}

/// `GET /health` response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when both artifacts loaded, otherwise `degraded`.
    pub status: &'static str,
    pub model_loaded: bool,
    pub dream_count: usize,
    pub neighbors: usize,
    pub uptime_seconds: i64,
    pub load_error: Option<String>,
}

/// `GET /health`
pub async fn health(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    let uptime_seconds = (Utc::now() - ctx.started_at()).num_seconds().max(0);
    let response = match ctx.engine() {
        Some(engine) => HealthResponse {
            status: "ok",
            model_loaded: true,
            dream_count: engine.table().len(),
            neighbors: engine.neighbors(),
            uptime_seconds,
            load_error: None,
        },
        None => HealthResponse {
            status: "degraded",
            model_loaded: false,
            dream_count: 0,
            neighbors: 0,
            uptime_seconds,
            load_error: ctx.load_error().map(str::to_string),
        },
    };
    Json(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_without_engine_is_500() {
        let ctx = AppContext::degraded("model artifact: missing");
        let result = generate_dream(State(ctx), Bytes::from_static(b"{}")).await;
        assert!(matches!(result, Err(ApiError::ModelNotLoaded)));
    }

    #[tokio::test]
    async fn test_health_degraded() {
        let ctx = AppContext::degraded("dream table: missing");
        let Json(response) = health(State(ctx)).await;
        assert_eq!(response.status, "degraded");
        assert!(!response.model_loaded);
        assert_eq!(response.load_error.as_deref(), Some("dream table: missing"));
        assert!(response.uptime_seconds >= 0);
    }
}
