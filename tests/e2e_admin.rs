// tests/e2e_admin.rs
use axum::http::StatusCode;
use draco_panel::domain::audit::Severity;
use serde_json::json;

mod support;
use support::*;

async fn app_with_users() -> TestApp {
    let app = TestApp::new();
    app.seed_user("admin-1", "root", true).await;
    app.seed_user("u1", "alice", false).await;
    app.seed_user("u2", "bob", false).await;
    app
}

#[tokio::test]
async fn non_admin_is_denied_and_audited() {
    let app = app_with_users().await;
    let session = app.login("alice").await;

    let resp = app.send(get_json("/api/admin/users", Some(&session))).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let entry = app.find_audit("admin:access_denied").await.expect("audited");
    assert_eq!(entry.severity, Severity::Critical);
    assert_eq!(entry.metadata["reason"], "insufficient_privileges");
    assert_eq!(entry.metadata["path"], "/api/admin/users");
}

#[tokio::test]
async fn non_admin_browser_is_sent_home() {
    let app = app_with_users().await;
    let session = app.login("alice").await;
    let resp = app.send(get("/api/admin/users", Some(&session))).await;
    assert_eq!(location(&resp), Some("/"));
}

#[tokio::test]
async fn anonymous_admin_call_is_unauthorized() {
    let app = app_with_users().await;
    let resp = app.send(get_json("/api/admin/users", None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let entry = app.find_audit("admin:access_denied").await.expect("audited");
    assert_eq!(entry.metadata["reason"], "not_authenticated");
}

#[tokio::test]
async fn admin_lists_users_without_password_hashes() {
    let app = app_with_users().await;
    let session = app.login("root").await;

    let resp = app.send(get_json("/api/admin/users", Some(&session))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 3);
    assert!(users.iter().all(|u| u.get("password").is_none()));
    assert_eq!(users[1]["plan"], "free");

    let granted = app.find_audit("admin:access_granted").await.expect("audited");
    assert_eq!(granted.severity, Severity::Warning);
}

#[tokio::test]
async fn audit_log_endpoint_filters() {
    let app = app_with_users().await;
    app.send(login_request("alice", "wrong", true)).await;
    let session = app.login("root").await;

    let resp = app
        .send(get_json(
            "/api/admin/audit-logs?severity=critical",
            Some(&session),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let logs = body["logs"].as_array().unwrap();
    assert_eq!(body["count"], logs.len());
    assert!(!logs.is_empty());
    assert!(logs.iter().all(|l| l["severity"] == "critical"));

    let resp = app
        .send(get_json(
            "/api/admin/audit-logs?userId=admin-1&action=login&limit=1",
            Some(&session),
        ))
        .await;
    let body = body_json(resp).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["logs"][0]["action"], "login:success");

    let resp = app
        .send(get_json(
            "/api/admin/audit-logs?startDate=2024-01-02",
            Some(&session),
        ))
        .await;
    assert_eq!(body_json(resp).await["count"], 0);

    let resp = app
        .send(get_json(
            "/api/admin/audit-logs?endDate=2024-01-01",
            Some(&session),
        ))
        .await;
    assert!(body_json(resp).await["count"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn malformed_audit_filter_is_bad_request() {
    let app = app_with_users().await;
    let session = app.login("root").await;
    let resp = app
        .send(get_json("/api/admin/audit-logs?severity=loud", Some(&session)))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn users_read_their_own_record_only() {
    let app = app_with_users().await;
    let alice = app.login("alice").await;

    let resp = app.send(get_json("/api/users/u1", Some(&alice))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["username"], "alice");

    let resp = app.send(get_json("/api/users/u2", Some(&alice))).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let denied = app.find_audit("access:denied").await.expect("audited");
    assert_eq!(denied.metadata["targetUserId"], "u2");

    let root = app.login("root").await;
    let resp = app.send(get_json("/api/users/u2", Some(&root))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let access = app.find_audit("admin:resource_access").await.expect("audited");
    assert_eq!(access.metadata["targetUserId"], "u2");

    let resp = app.send(get_json("/api/users/missing", Some(&root))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_or_self_requires_a_session() {
    let app = app_with_users().await;
    let resp = app.send(get_json("/api/users/u1", None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(resp).await,
        json!({ "success": false, "message": "Authentication required" })
    );
}

#[tokio::test]
async fn demoted_admin_loses_access_on_the_next_request() {
    let app = app_with_users().await;
    let session = app.login("root").await;
    let resp = app.send(get_json("/api/admin/users", Some(&session))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let mut users = app.get_value("users").await.unwrap();
    users[0]["admin"] = json!(false);
    app.put("users", &users).await;

    let resp = app.send(get_json("/api/admin/users", Some(&session))).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let denied = app.find_audit("admin:access_denied").await.expect("audited");
    assert_eq!(denied.user_id, "admin-1");
}

#[tokio::test]
async fn deleted_user_session_is_revoked() {
    let app = app_with_users().await;
    let session = app.login("alice").await;

    let users = app.get_value("users").await.unwrap();
    let remaining: Vec<_> = users
        .as_array()
        .unwrap()
        .iter()
        .filter(|user| user["userId"] != "u1")
        .cloned()
        .collect();
    app.put("users", &remaining).await;

    let resp = app.send(get("/instances", Some(&session))).await;
    assert_eq!(location(&resp), Some("/auth/login"));

    // Restoring the record does not bring the session back.
    app.put("users", &users).await;
    let resolved = app
        .state
        .services
        .resolve_session(&session.session_id)
        .await
        .unwrap();
    assert!(resolved.is_none());
}
