// tests/e2e_auth.rs
use axum::http::{StatusCode, header};
use draco_panel::domain::audit::Severity;

mod support;
use support::*;

#[tokio::test]
async fn anonymous_browser_is_redirected_to_login() {
    let app = TestApp::new();
    let resp = app.send(get("/instances", None)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/auth/login"));

    let entry = app.find_audit("access:unauthorized").await.expect("audited");
    assert_eq!(entry.user_id, "anonymous");
    assert_eq!(entry.metadata["path"], "/instances");
    assert_eq!(entry.metadata["method"], "GET");
}

#[tokio::test]
async fn anonymous_ajax_gets_401_json() {
    let app = TestApp::new();
    let resp = app.send(get_json("/instances", None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn successful_login_sets_cookie_and_audits() {
    let app = TestApp::new();
    app.seed_user("u1", "alice", false).await;

    let resp = app.send(login_request("alice", PASSWORD, false)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/instances"));

    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    // development environment: no Secure flag
    assert!(!cookie.contains("Secure"));

    let entry = app.find_audit("login:success").await.expect("audited");
    assert_eq!(entry.user_id, "u1");
    assert_eq!(entry.username, "alice");
}

#[tokio::test]
async fn json_login_returns_redirect_target() {
    let app = TestApp::new();
    app.seed_user("u1", "alice", false).await;

    let resp = app.send(login_request("alice", PASSWORD, true)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_id_from(&resp).is_some());
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["redirect"], "/instances");
}

#[tokio::test]
async fn failed_login_is_critical_and_sets_no_cookie() {
    let app = TestApp::new();
    app.seed_user("u1", "alice", false).await;

    let resp = app.send(login_request("alice", "wrong", true)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(session_id_from(&resp).is_none());
    assert_eq!(body_json(resp).await["message"], "Invalid username or password");

    let entry = app.find_audit("login:failed").await.expect("audited");
    assert_eq!(entry.severity, Severity::Critical);
    assert_eq!(entry.metadata["username"], "alice");
    assert!(app.sink.find("login:failed").is_some());
}

#[tokio::test]
async fn failed_browser_login_rerenders_form() {
    let app = TestApp::new();
    let resp = app.send(login_request("nobody", "x", false)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let html = body_string(resp).await;
    assert!(html.contains("Invalid username or password"));
    assert!(html.contains("<form"));
}

#[tokio::test]
async fn signed_in_user_sees_instances_and_skips_login_page() {
    let app = TestApp::new();
    app.seed_user("u1", "alice", false).await;
    let session = app.login("alice").await;

    let resp = app.send(get("/instances", Some(&session))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("Welcome back, alice."));
    assert!(html.contains(&session.csrf));

    let resp = app.send(get("/auth/login", Some(&session))).await;
    assert_eq!(location(&resp), Some("/instances"));
}

#[tokio::test]
async fn logout_revokes_session() {
    let app = TestApp::new();
    app.seed_user("u1", "alice", false).await;
    let session = app.login("alice").await;

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .header(header::COOKIE, &session.cookie)
        .header("x-csrf-token", &session.csrf)
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = app.send(req).await;
    assert_eq!(location(&resp), Some("/auth/login"));
    let cleared = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));
    assert!(app.find_audit("logout").await.is_some());

    let resp = app.send(get("/instances", Some(&session))).await;
    assert_eq!(location(&resp), Some("/auth/login"));
}

fn forged_login(peer: [u8; 4]) -> axum::http::Request<axum::body::Body> {
    let mut req = login_request("mallory", "wrong", true);
    req.headers_mut()
        .insert("x-forwarded-for", header::HeaderValue::from_static("203.0.113.99"));
    req.extensions_mut()
        .insert(axum::extract::ConnectInfo(std::net::SocketAddr::from((peer, 40000))));
    req
}

#[tokio::test]
async fn forwarded_for_is_ignored_without_a_trusted_proxy() {
    let app = TestApp::new();
    app.send(forged_login([192, 0, 2, 10])).await;

    let entry = app.find_audit("login:failed").await.expect("audited");
    assert_eq!(entry.ip, "192.0.2.10");
}

#[tokio::test]
async fn forwarded_for_is_recorded_behind_a_trusted_proxy() {
    let app = TestAppBuilder::new().trust_proxy().build();
    app.send(forged_login([10, 0, 0, 2])).await;

    let entry = app.find_audit("login:failed").await.expect("audited");
    assert_eq!(entry.ip, "203.0.113.99");
}
