//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use portcullis::{
    api::routes::create_router, db::TursoClient, utils::clock::Clock, AppConfig, AppState,
};
use serde_json::{json, Value};

pub const TEST_SECRET: &str = "integration-test-secret-that-is-32-chars+";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::with_jwt_secret(TEST_SECRET);
    config.database.url = ":memory:".to_string();
    config.rate_limit.enabled = false;
    config
}

/// Router over a fresh in-memory database.
pub async fn create_test_server() -> (TestServer, AppState) {
    let repo = TursoClient::new_memory()
        .await
        .expect("Failed to create in-memory database");
    let state = AppState::new(test_config(), Arc::new(repo));
    let server = TestServer::new(create_router(state.clone())).expect("Failed to create test server");
    (server, state)
}

/// Same as [`create_test_server`] but with a pinned clock.
pub async fn create_test_server_with_clock(clock: Arc<dyn Clock>) -> (TestServer, AppState) {
    let repo = TursoClient::new_memory()
        .await
        .expect("Failed to create in-memory database");
    let state = AppState::with_clock(test_config(), Arc::new(repo), clock);
    let server = TestServer::new(create_router(state.clone())).expect("Failed to create test server");
    (server, state)
}

/// Registers a user and returns the response body.
pub async fn register(server: &TestServer, email: &str, name: &str, password: &str) -> Value {
    let response = server
        .post("/users")
        .json(&json!({ "email": email, "name": name, "password": password }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

/// Logs in and returns the bearer token.
pub async fn login(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/login")
        .json(&json!({ "email": email, "password": password }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["token"]
        .as_str()
        .expect("login response should carry a token")
        .to_string()
}
