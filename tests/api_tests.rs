//! End-to-end HTTP tests against the real router and an in-memory database.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use portcullis::{auth::jwt::TokenService, utils::clock::FixedClock};
use serde_json::{json, Value};

use common::{create_test_server, create_test_server_with_clock, login, register, TEST_SECRET};

// ============= Health =============

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_server().await;

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "UP");
    assert_eq!(body["message"], "Healthy!");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_healthy_alias() {
    let (server, _) = create_test_server().await;

    let response = server.get("/healthy").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "UP");
    assert_eq!(body["message"], "Healthy!");
}

// ============= Registration =============

#[tokio::test]
async fn test_register_user() {
    let (server, _) = create_test_server().await;

    let response = server
        .post("/users")
        .json(&json!({
            "email": "a@b.com",
            "name": "A",
            "password": "secret1"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["email"], "a@b.com");
    assert_eq!(body["name"], "A");
    assert!(body["id"].is_string());
    assert!(body["created_at"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_with_last_name() {
    let (server, _) = create_test_server().await;

    let response = server
        .post("/users")
        .json(&json!({
            "email": "grace@navy.mil",
            "name": "Grace",
            "last_name": "Hopper",
            "password": "cobol-rules"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["last_name"], "Hopper");
}

#[tokio::test]
async fn test_register_invalid_email() {
    let (server, _) = create_test_server().await;

    let response = server
        .post("/users")
        .json(&json!({
            "email": "not-an-email",
            "name": "A",
            "password": "secret1"
        }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("invalid input"));
}

#[tokio::test]
async fn test_register_empty_name() {
    let (server, _) = create_test_server().await;

    let response = server
        .post("/users")
        .json(&json!({
            "email": "a@b.com",
            "name": "",
            "password": "secret1"
        }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_register_short_password() {
    let (server, _) = create_test_server().await;

    let response = server
        .post("/users")
        .json(&json!({
            "email": "a@b.com",
            "name": "A",
            "password": "12345"
        }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("at least 6"));
}

#[tokio::test]
async fn test_register_malformed_json() {
    let (server, _) = create_test_server().await;

    let response = server
        .post("/users")
        .content_type("application/json")
        .bytes("{\"email\": ".into())
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("invalid input"));
}

#[tokio::test]
async fn test_register_duplicate_email_is_opaque_500() {
    let (server, _) = create_test_server().await;
    register(&server, "a@b.com", "A", "secret1").await;

    let response = server
        .post("/users")
        .json(&json!({
            "email": "A@B.com",
            "name": "Other",
            "password": "secret2"
        }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "internal server error");
}

// ============= Login =============

#[tokio::test]
async fn test_register_and_login() {
    let (server, state) = create_test_server().await;
    let user = register(&server, "a@b.com", "A", "secret1").await;

    let response = server
        .post("/login")
        .json(&json!({ "email": "a@b.com", "password": "secret1" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["id"], user["id"]);
    assert!(body["user"].get("password_hash").is_none());

    let claims = state
        .token_service
        .validate(body["token"].as_str().unwrap())
        .expect("issued token should validate");
    assert_eq!(claims.sub, user["id"].as_str().unwrap());
    assert_eq!(claims.email, "a@b.com");
    assert_eq!(claims.exp - claims.iat, 86_400);
}

#[tokio::test]
async fn test_login_unknown_user() {
    let (server, _) = create_test_server().await;

    let response = server
        .post("/login")
        .json(&json!({ "email": "nobody@b.com", "password": "secret1" }))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "invalid credentials" }));
}

#[tokio::test]
async fn test_login_wrong_password_matches_unknown_user() {
    let (server, _) = create_test_server().await;
    register(&server, "a@b.com", "A", "secret1").await;

    let wrong = server
        .post("/login")
        .json(&json!({ "email": "a@b.com", "password": "wrong-password" }))
        .await;
    let unknown = server
        .post("/login")
        .json(&json!({ "email": "nobody@b.com", "password": "wrong-password" }))
        .await;

    wrong.assert_status_unauthorized();
    unknown.assert_status_unauthorized();
    assert_eq!(wrong.text(), unknown.text());
}

#[tokio::test]
async fn test_login_malformed_email_is_bad_request() {
    let (server, _) = create_test_server().await;

    let response = server
        .post("/login")
        .json(&json!({ "email": "not-an-email", "password": "secret1" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("email must be a valid email address"));
}

#[tokio::test]
async fn test_login_missing_fields() {
    let (server, _) = create_test_server().await;

    let response = server
        .post("/login")
        .json(&json!({ "email": "a@b.com" }))
        .await;

    response.assert_status_bad_request();
}

// ============= Protected routes =============

#[tokio::test]
async fn test_get_user_requires_token() {
    let (server, _) = create_test_server().await;

    let response = server
        .get(&format!("/api/users/{}", uuid::Uuid::new_v4()))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"], "no authentication token provided");
}

#[tokio::test]
async fn test_get_user_with_malformed_header() {
    let (server, _) = create_test_server().await;

    let response = server
        .get(&format!("/api/users/{}", uuid::Uuid::new_v4()))
        .add_header("Authorization", "Token abc")
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid token format");
}

#[tokio::test]
async fn test_get_user_with_valid_token() {
    let (server, _) = create_test_server().await;
    let user = register(&server, "a@b.com", "A", "secret1").await;
    let token = login(&server, "a@b.com", "secret1").await;

    let response = server
        .get(&format!("/api/users/{}", user["id"].as_str().unwrap()))
        .add_header("Authorization", format!("Bearer {}", token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["email"], "a@b.com");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_get_missing_user_is_404() {
    let (server, _) = create_test_server().await;
    register(&server, "a@b.com", "A", "secret1").await;
    let token = login(&server, "a@b.com", "secret1").await;

    let response = server
        .get(&format!("/api/users/{}", uuid::Uuid::new_v4()))
        .add_header("Authorization", format!("Bearer {}", token))
        .await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"], "user not found");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let (server, _) = create_test_server().await;
    let user = register(&server, "a@b.com", "A", "secret1").await;

    let issued_long_ago = TokenService::new(
        TEST_SECRET,
        Duration::hours(24),
        Arc::new(FixedClock::new(Utc::now() - Duration::hours(25))),
    )
    .issue(user["id"].as_str().unwrap(), "a@b.com")
    .unwrap();

    let response = server
        .get(&format!("/api/users/{}", user["id"].as_str().unwrap()))
        .add_header("Authorization", format!("Bearer {}", issued_long_ago.token))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid token");
}

#[tokio::test]
async fn test_token_from_other_secret_is_rejected() {
    let (server, _) = create_test_server().await;
    let user = register(&server, "a@b.com", "A", "secret1").await;

    let forged = TokenService::new(
        "some-other-secret-that-is-32-chars-long",
        Duration::hours(24),
        Arc::new(FixedClock::new(Utc::now())),
    )
    .issue(user["id"].as_str().unwrap(), "a@b.com")
    .unwrap();

    let response = server
        .get("/api/me")
        .add_header("Authorization", format!("Bearer {}", forged.token))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid token");
}

#[tokio::test]
async fn test_me_returns_caller() {
    let (server, _) = create_test_server().await;
    let user = register(&server, "a@b.com", "A", "secret1").await;
    let token = login(&server, "a@b.com", "secret1").await;

    let response = server
        .get("/api/me")
        .add_header("Authorization", format!("Bearer {}", token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], user["id"]);
}

#[tokio::test]
async fn test_pinned_clock_sets_timestamps() {
    let now = Utc::now() - Duration::minutes(5);
    let (server, _) = create_test_server_with_clock(Arc::new(FixedClock::new(now))).await;

    let user = register(&server, "a@b.com", "A", "secret1").await;
    let response = server
        .post("/login")
        .json(&json!({ "email": "a@b.com", "password": "secret1" }))
        .await;

    response.assert_status_ok();
    let created_at: chrono::DateTime<Utc> =
        serde_json::from_value(user["created_at"].clone()).unwrap();
    assert_eq!(created_at.timestamp(), now.timestamp());

    let body: Value = response.json();
    let expires_at: chrono::DateTime<Utc> =
        serde_json::from_value(body["expires_at"].clone()).unwrap();
    assert_eq!(expires_at.timestamp(), now.timestamp() + 86_400);
}

// ============= Deletion =============

#[tokio::test]
async fn test_delete_own_account() {
    let (server, _) = create_test_server().await;
    let user = register(&server, "a@b.com", "A", "secret1").await;
    let token = login(&server, "a@b.com", "secret1").await;
    let path = format!("/api/users/{}", user["id"].as_str().unwrap());

    server
        .delete(&path)
        .add_header("Authorization", format!("Bearer {}", token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    // The token is still cryptographically valid, but the user is gone.
    server
        .get(&path)
        .add_header("Authorization", format!("Bearer {}", token))
        .await
        .assert_status_not_found();

    server
        .post("/login")
        .json(&json!({ "email": "a@b.com", "password": "secret1" }))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_deleted_email_can_register_again() {
    let (server, _) = create_test_server().await;
    let original = register(&server, "a@b.com", "A", "secret1").await;
    let token = login(&server, "a@b.com", "secret1").await;

    server
        .delete(&format!("/api/users/{}", original["id"].as_str().unwrap()))
        .add_header("Authorization", format!("Bearer {}", token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let again = register(&server, "a@b.com", "A2", "secret2").await;
    assert_ne!(again["id"], original["id"]);

    server
        .post("/login")
        .json(&json!({ "email": "a@b.com", "password": "secret1" }))
        .await
        .assert_status_unauthorized();
    let token = login(&server, "a@b.com", "secret2").await;

    let me: Value = server
        .get("/api/me")
        .add_header("Authorization", format!("Bearer {}", token))
        .await
        .json();
    assert_eq!(me["id"], again["id"]);
    assert_eq!(me["name"], "A2");
}

#[tokio::test]
async fn test_delete_someone_else_is_forbidden() {
    let (server, _) = create_test_server().await;
    let victim = register(&server, "victim@b.com", "V", "secret1").await;
    register(&server, "mallory@b.com", "M", "secret1").await;
    let token = login(&server, "mallory@b.com", "secret1").await;

    let response = server
        .delete(&format!("/api/users/{}", victim["id"].as_str().unwrap()))
        .add_header("Authorization", format!("Bearer {}", token))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);

    server
        .post("/login")
        .json(&json!({ "email": "victim@b.com", "password": "secret1" }))
        .await
        .assert_status_ok();
}
