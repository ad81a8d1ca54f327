mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get};

#[tokio::test]
async fn health_reports_ok_with_version() {
    let app = build_test_app();

    let response = get(&app.router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["storage_healthy"], true);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = build_test_app();

    let response = get(&app.router, "/health").await;
    let request_id = response.headers().get("x-request-id");
    assert!(request_id.is_some_and(|v| !v.is_empty()));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = build_test_app();

    let response = get(&app.router, "/api/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
