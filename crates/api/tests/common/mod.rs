#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use proofsheet_api::config::ServerConfig;
use proofsheet_api::router::build_app_router;
use proofsheet_api::state::AppState;
use proofsheet_core::params::ModelParams;
use proofsheet_pipeline::dispatcher::GenerationDispatcher;
use proofsheet_pipeline::error::GenerationError;
use proofsheet_pipeline::generator::ImageGenerator;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Fake generators
// ---------------------------------------------------------------------------

/// Returns a PNG signature followed by junk. Enough for the PNG check.
pub struct InstantGenerator;

#[async_trait]
impl ImageGenerator for InstantGenerator {
    async fn generate(&self, _: &str, _: &ModelParams) -> Result<Vec<u8>, GenerationError> {
        Ok(b"\x89PNG\r\n\x1a\nproofsheet-test".to_vec())
    }
}

/// Never completes, so every cell stays pending.
pub struct StalledGenerator;

#[async_trait]
impl ImageGenerator for StalledGenerator {
    async fn generate(&self, _: &str, _: &ModelParams) -> Result<Vec<u8>, GenerationError> {
        std::future::pending().await
    }
}

// ---------------------------------------------------------------------------
// App builder
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub dispatcher: Arc<GenerationDispatcher>,
    pub config: ServerConfig,
    _data_dir: TempDir,
}

impl TestApp {
    pub fn data_dir(&self) -> PathBuf {
        self.config.data_dir.clone()
    }
}

/// Build a test `ServerConfig` rooted at `data_dir`.
pub fn test_config(data_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        database_url: "sqlite::memory:".to_string(),
        data_dir,
        static_dir: PathBuf::from("../../static"),
        poll_interval_ms: 300,
    }
}

/// Build the full application router over `pool`, generating images with
/// `generator` into a fresh temporary data directory.
pub fn build_test_app(pool: SqlitePool, generator: Arc<dyn ImageGenerator>) -> TestApp {
    let data_dir = tempfile::tempdir().unwrap();
    let config = test_config(data_dir.path().to_path_buf());
    let dispatcher = Arc::new(GenerationDispatcher::new(pool.clone(), generator, 4));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        dispatcher: Arc::clone(&dispatcher),
    };

    TestApp {
        router: build_app_router(state, &config),
        dispatcher,
        config,
        _data_dir: data_dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn post_form(app: &TestApp, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{k}={}", v.replace(' ', "+")))
        .collect::<Vec<_>>()
        .join("&");
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &TestApp, uri: &str, json: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// A valid submission: steps 1..50 across, guidance 1..10 down.
pub fn valid_form(grid_size: &'static str) -> Vec<(&'static str, &'static str)> {
    vec![
        ("prompt", "a lighthouse at dusk"),
        ("grid_size", grid_size),
        ("seed", "42"),
        ("x_param", "num_inference_steps"),
        ("x_range_start", "1"),
        ("x_range_end", "50"),
        ("y_param", "guidance_scale"),
        ("y_range_start", "1"),
        ("y_range_end", "10"),
    ]
}

pub fn assert_ok(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::OK);
}
