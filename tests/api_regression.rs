//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! both endpoints using `tower::ServiceExt::oneshot()`.
//! No binary spawn, no network port.

use dreamscape::api::create_app;
use dreamscape::api::error::MODEL_NOT_LOADED;
use dreamscape::config::ServiceConfig;
use dreamscape::{AppContext, SequenceRegressor};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const TABLE: &str = "\
dream_id,original_text,clean_text,mood_valence,mood_arousal,emotions,settings,characters,objects,activities,colors,themes
0,I flew over my house,i flew over my house,0.8,0.6,['happy'],['home'],[],[],[],[],['flying']
1,Chased through the city,chased through the city,-0.7,0.9,['fear'],['city'],[],[],[],[],['chase']
2,A quiet classroom,a quiet classroom,0.0,-0.5,['neutral'],\"['home', 'school']\",[],[],[],[],['everyday']
";

/// Artifacts on disk plus a config pointing at them.
fn fixture() -> (TempDir, ServiceConfig) {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("dream_model.json");
    let dataset_path = dir.path().join("processed_dreams.csv");
    SequenceRegressor::seeded(7, 8).save(&model_path).unwrap();
    std::fs::write(&dataset_path, TABLE).unwrap();

    let mut config = ServiceConfig::default();
    config.artifacts.model_path = model_path;
    config.artifacts.dataset_path = dataset_path;
    (dir, config)
}

fn ready_app() -> (TempDir, Router) {
    let (dir, config) = fixture();
    let ctx = AppContext::load(&config);
    assert!(ctx.engine().is_some(), "fixture failed to load: {:?}", ctx.load_error());
    (dir, create_app(ctx, &config.server))
}

fn sample_body() -> Value {
    json!({
        "eeg_theta_power": 91.9,
        "eeg_gamma_power": 14.8,
        "eeg_delta_power": 80.5,
        "heart_rate_bpm": 80.8,
        "hrv_ms": 41.0,
        "rem_bursts": 1,
        "chin_emg": 12.7,
        "respiration_rate": 12.3,
        "resp_irregularity": 0.041,
        "skin_conductance": 2.35
    })
}

fn post_json(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate_dream")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn read_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A valid reading yields a prompt and two finite floats.
#[tokio::test]
async fn test_generate_dream_returns_prompt_and_emotion() {
    let (_dir, app) = ready_app();

    let resp = app.oneshot(post_json(sample_body().to_string())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = read_json(resp).await;
    let prompt = json["prompt"].as_str().expect("prompt should be a string");
    assert!(prompt.starts_with("A dreamlike, surreal scene about '"), "got: {prompt}");

    let valence = json["predicted_emotion"]["valence"].as_f64().unwrap();
    let arousal = json["predicted_emotion"]["arousal"].as_f64().unwrap();
    assert!(valence.is_finite() && arousal.is_finite());
}

/// Same body, same model: same answer.
#[tokio::test]
async fn test_generate_dream_is_deterministic() {
    let (_dir, app) = ready_app();

    let first = read_json(app.clone().oneshot(post_json(sample_body().to_string())).await.unwrap()).await;
    let second = read_json(app.oneshot(post_json(sample_body().to_string())).await.unwrap()).await;
    assert_eq!(first, second);
}

/// Extra keys are ignored.
#[tokio::test]
async fn test_generate_dream_ignores_unknown_keys() {
    let (_dir, app) = ready_app();
    let mut body = sample_body();
    body["device"] = json!("headband-v2");

    let resp = app.oneshot(post_json(body.to_string())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

/// Missing key -> 400 with a message naming it.
#[tokio::test]
async fn test_missing_key_returns_400() {
    let (_dir, app) = ready_app();
    let mut body = sample_body();
    body.as_object_mut().unwrap().remove("hrv_ms");

    let resp = app.oneshot(post_json(body.to_string())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json = read_json(resp).await;
    let msg = json["error"].as_str().unwrap();
    assert!(msg.contains("hrv_ms"), "got: {msg}");
}

/// Non-numeric value and malformed JSON -> 400 with a non-empty message.
#[tokio::test]
async fn test_bad_payloads_return_400() {
    let mut wrong_type = sample_body();
    wrong_type["heart_rate_bpm"] = json!("fast");

    for body in [wrong_type.to_string(), "{not json".to_string(), String::new(), "[1,2,3]".to_string()] {
        let (_dir, app) = ready_app();
        let resp = app.oneshot(post_json(body.clone())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");

        let json = read_json(resp).await;
        assert!(!json["error"].as_str().unwrap().is_empty());
    }
}

/// Artifacts missing at startup: 500 on every generation request.
#[tokio::test]
async fn test_missing_artifacts_return_500() {
    let (_dir, mut config) = fixture();
    config.artifacts.dataset_path = "/nonexistent/processed_dreams.csv".into();
    let ctx = AppContext::load(&config);
    assert!(ctx.engine().is_none());
    let app = create_app(ctx, &config.server);

    let resp = app.oneshot(post_json(sample_body().to_string())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(resp).await, json!({ "error": MODEL_NOT_LOADED }));
}

/// Oversized bodies are refused before parsing.
#[tokio::test]
async fn test_oversized_body_returns_413() {
    let (_dir, mut config) = fixture();
    config.server.max_body_bytes = 1024;
    let app = create_app(AppContext::load(&config), &config.server);

    let padding = "x".repeat(4096);
    let mut body = sample_body();
    body["padding"] = json!(padding);
    let body = body.to_string();

    let req = Request::builder()
        .method("POST")
        .uri("/generate_dream")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    // Rejected by the body limit, so not the handler's JSON error shape
    let content_type = resp.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok());
    assert_ne!(content_type, Some("application/json"));
}

/// Handler errors carry a JSON content type.
#[tokio::test]
async fn test_handler_errors_are_json() {
    let (_dir, app) = ready_app();

    let resp = app.oneshot(post_json("{not json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
}

/// /health reports a loaded service.
#[tokio::test]
async fn test_health_ok() {
    let (_dir, app) = ready_app();

    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = read_json(resp).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["model_loaded"], true);
    assert_eq!(json["dream_count"], 3);
    assert_eq!(json["neighbors"], 3);
    assert!(json["load_error"].is_null());
}

/// /health reports degraded when startup loading failed.
#[tokio::test]
async fn test_health_degraded() {
    let mut config = ServiceConfig::default();
    config.artifacts.model_path = "/nonexistent/dream_model.json".into();
    let app = create_app(AppContext::load(&config), &config.server);

    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = read_json(resp).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["model_loaded"], false);
    assert!(json["load_error"].as_str().unwrap().contains("model artifact"));
}

/// Unknown routes are 404; wrong method is 405.
#[tokio::test]
async fn test_routing_errors() {
    let (_dir, app) = ready_app();

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .oneshot(Request::builder().uri("/generate_dream").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
