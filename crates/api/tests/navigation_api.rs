//! End-to-end tests for the local save endpoint and exports.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, build_test_app, get, post_json, post_raw};
use navedit_events::event_types;
use serde_json::{json, Value};

fn envelope() -> Value {
    json!({
        "headerData": {
            "links": [
                { "text": "Home", "href": "/" },
                {
                    "text": "Blog",
                    "links": [
                        { "text": "All posts", "href": "/blog" },
                        { "text": "Launch", "href": "/blog/launch" }
                    ]
                }
            ],
            "actions": [
                { "text": "Download", "href": "https://example.com/dl", "target": "_blank" }
            ]
        },
        "footerData": {
            "links": [
                { "title": "Product", "links": [{ "text": "Features", "href": "#features" }] }
            ],
            "secondaryLinks": [{ "text": "Terms", "href": "/terms" }],
            "socialLinks": [
                { "ariaLabel": "GitHub", "icon": "tabler:brand-github", "href": "https://github.com/acme" }
            ],
            "footNote": "Made by Acme"
        },
        "layout": {
            "type": "landing",
            "headerVisible": true,
            "footerVisible": false,
            "sidebarPosition": "none"
        },
        "lastUpdated": "2026-03-01T10:00:00Z",
        "version": "1.0.0"
    })
}

#[tokio::test]
async fn get_before_any_save_is_404() {
    let app = build_test_app();

    let response = get(&app.router, "/api/navigation").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn save_then_load_round_trips_envelope() {
    let app = build_test_app();
    let mut events = app.event_bus.subscribe();

    let response = post_json(&app.router, "/api/navigation", &envelope()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["success"], true);
    assert_eq!(json["data"]["lastUpdated"], "2026-03-01T10:00:00Z");

    let event = events.recv().await.unwrap();
    assert_eq!(event.event_type, event_types::NAVIGATION_SAVED);

    let response = get(&app.router, "/api/navigation").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["headerData"], envelope()["headerData"]);
    assert_eq!(json["data"]["footerData"], envelope()["footerData"]);
    assert_eq!(json["data"]["layout"]["type"], "landing");

    assert!(app.dir.path().join("navigation-data.json").exists());
}

#[tokio::test]
async fn structurally_invalid_body_is_rejected_with_field_errors() {
    let app = build_test_app();
    let mut body = envelope();
    body["headerData"]["links"] = json!("not a list");
    body["footerData"].as_object_mut().unwrap().remove("footNote");

    let response = post_json(&app.router, "/api/navigation", &body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"headerData.links"));
    assert!(fields.contains(&"footerData.footNote"));

    // Nothing was written.
    let response = get(&app.router, "/api/navigation").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = build_test_app();

    let response = post_raw(&app.router, "/api/navigation", "{ not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn typescript_export_uses_permalink_helpers() {
    let app = build_test_app();
    post_json(&app.router, "/api/navigation", &envelope()).await;

    let response = get(&app.router, "/api/navigation/export/typescript").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));

    let source = body_text(response).await;
    assert!(source.starts_with("import { getPermalink, getBlogPermalink }"));
    assert!(source.contains("export const headerData = {"));
    assert!(source.contains("export const footerData = {"));
    assert!(source.contains("href: getBlogPermalink(),"));
    assert!(source.contains("getBlogPermalink('launch')"));
    assert!(source.contains("getPermalink('#features')"));
    assert!(source.contains("'https://example.com/dl'"));
    assert!(source.contains("footNote: 'Made by Acme'"));
}

#[tokio::test]
async fn json_export_contains_sections_without_envelope_metadata() {
    let app = build_test_app();
    post_json(&app.router, "/api/navigation", &envelope()).await;

    let response = get(&app.router, "/api/navigation/export/json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["headerData"], envelope()["headerData"]);
    assert_eq!(json["layout"]["footerVisible"], false);
    assert!(json.get("lastUpdated").is_none());
}

#[tokio::test]
async fn exports_require_saved_data() {
    let app = build_test_app();

    for uri in [
        "/api/navigation/export/typescript",
        "/api/navigation/export/json",
    ] {
        let response = get(&app.router, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn cors_preflight_allows_editor_origin() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let app = build_test_app();
    let response = app
        .router
        .clone()
        .oneshot(
            Request::options("/api/navigation")
                .header("origin", "http://localhost:4321")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:4321"
    );
}
