#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use navedit_api::config::ServerConfig;
use navedit_api::router::build_app_router;
use navedit_api::state::AppState;
use navedit_events::EventBus;
use navedit_persistence::FileStore;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(data_dir: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:4321".to_string()],
        request_timeout_secs: 30,
        data_dir: data_dir.path().to_path_buf(),
    }
}

/// A router backed by a fresh temporary data directory.
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub struct TestApp {
    pub router: Router,
    pub event_bus: Arc<EventBus>,
    pub dir: TempDir,
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let event_bus = Arc::new(EventBus::default());

    let state = AppState {
        config: Arc::new(config.clone()),
        store: Arc::new(FileStore::new(dir.path())),
        event_bus: Arc::clone(&event_bus),
    };

    TestApp {
        router: build_app_router(state, &config).unwrap(),
        event_bus,
        dir,
    }
}

pub async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: &serde_json::Value) -> Response {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: &Router, uri: &str, body: impl Into<Body>) -> Response {
    app.clone()
        .oneshot(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
