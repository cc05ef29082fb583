//! Route-level authorization outcomes.

mod common;

use axum::http::StatusCode;
use common::{request, TestApp};
use serde_json::json;
use test_case::test_case;

#[tokio::test]
async fn test_missing_identity_is_refused() {
    let app = TestApp::new();
    let (status, body) = app.send(request("GET", "/api/data", None)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body,
        json!({"error": "Forbidden", "message": "Authentication required"})
    );
    assert_eq!(app.details()[0]["reason_code"], "missing_identity");
}

#[tokio::test]
async fn test_empty_identity_is_missing() {
    let app = TestApp::new();
    let (status, body) = app.send(request("GET", "/api/data", Some(""))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn test_insufficient_permission() {
    let app = TestApp::new();
    let (status, body) = app.send(request("POST", "/api/data", Some("user3"))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body,
        json!({"error": "Forbidden", "message": "Insufficient permissions. Required: write"})
    );

    let details = app.details();
    assert_eq!(details.len(), 1);
    let reason = details[0]["reason"].as_str().unwrap();
    assert!(reason.contains("read"));
    assert!(reason.contains("write"));
}

#[tokio::test]
async fn test_allowed_read_is_not_audited() {
    let app = TestApp::new();
    let (status, body) = app.send(request("GET", "/api/data", Some("user1"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"data": "Sample data", "message": "Read successful"})
    );
    assert!(app.sink.is_empty());
}

#[tokio::test]
async fn test_unknown_user_is_invalid() {
    let app = TestApp::new();
    let (status, body) = app.send(request("GET", "/api/data", Some("mallory"))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid user");
    assert_eq!(
        app.details()[0]["extra_context"],
        json!({"attempted_user_id": "mallory"})
    );
}

#[test_case("GET", "/api/data", "user2", StatusCode::OK ; "user reads")]
#[test_case("POST", "/api/data", "user2", StatusCode::OK ; "user writes")]
#[test_case("DELETE", "/api/data/7", "user2", StatusCode::FORBIDDEN ; "user cannot delete")]
#[test_case("DELETE", "/api/data/7", "user1", StatusCode::OK ; "admin deletes")]
#[test_case("GET", "/api/data", "user3", StatusCode::OK ; "guest reads")]
#[test_case("POST", "/api/data", "user3", StatusCode::FORBIDDEN ; "guest cannot write")]
#[tokio::test]
async fn test_permission_matrix(method: &str, uri: &str, user: &str, expected: StatusCode) {
    let app = TestApp::new();
    let (status, _) = app.send(request(method, uri, Some(user))).await;

    assert_eq!(status, expected);
    assert_eq!(app.sink.is_empty(), expected == StatusCode::OK);
}

#[test_case("user1" ; "admin role")]
#[test_case("user2" ; "user role")]
#[test_case("user3" ; "guest role")]
#[tokio::test]
async fn test_admin_endpoint_always_refused(user: &str) {
    let app = TestApp::new();
    let (status, body) = app.send(request("GET", "/api/admin", Some(user))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Insufficient permissions. Required: admin");
}

#[tokio::test]
async fn test_success_bodies() {
    let app = TestApp::new();

    let (_, body) = app.send(request("POST", "/api/data", Some("user1"))).await;
    assert_eq!(body, json!({"message": "Data created successfully"}));

    let (_, body) = app.send(request("DELETE", "/api/data/42", Some("user1"))).await;
    assert_eq!(body, json!({"message": "Data 42 deleted successfully"}));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app.send(request("GET", "/api/missing", Some("user1"))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    assert!(app.sink.is_empty());
}

#[tokio::test]
async fn test_guard_runs_before_path_extraction() {
    let app = TestApp::new();
    let (status, _) = app
        .send(request("DELETE", "/api/data/not-a-number", Some("user3")))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app
        .send(request("DELETE", "/api/data/not-a-number", Some("user1")))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"error": "Not Found", "message": "The requested resource was not found"})
    );
    assert!(app.sink.is_empty());
}
