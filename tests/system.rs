// tests/system.rs
use axum::http::{StatusCode, header};

mod support;
use support::*;

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new();
    let resp = app.send(get("/health", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "ok");
}

#[tokio::test]
async fn openapi_document_lists_admin_routes() {
    let app = TestApp::new();
    let resp = app.send(get("/openapi.json", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let doc = body_json(resp).await;
    let paths = doc["paths"].as_object().unwrap();
    for path in [
        "/api/admin/users",
        "/api/admin/users/{user_id}/plan",
        "/api/admin/audit-logs",
        "/api/v1/instances",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }
    assert!(doc["components"]["securitySchemes"]["apiKey"].is_object());
}

#[tokio::test]
async fn csrf_script_is_served_as_javascript() {
    let app = TestApp::new();
    let resp = app.send(get("/js/csrf-universal.js", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
    assert!(content_type.starts_with("application/javascript"));
    assert!(body_string(resp).await.contains("csrf"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = TestApp::new();
    let resp = app.send(get("/nope", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
