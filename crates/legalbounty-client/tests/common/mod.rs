/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for legalbounty-client tests

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Canonical admin user fixture, as returned by the API
pub fn admin_user_json() -> serde_json::Value {
    serde_json::json!({
        "id": "1",
        "email": "admin@example.com",
        "username": "admin",
        "firstName": "Ada",
        "lastName": "Marshall",
        "role": "admin",
        "verified": true
    })
}

/// Mount a login mock that accepts exactly `admin@example.com` / `password`
/// and rejects everything else with 401
#[allow(dead_code)]
pub async fn mount_admin_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(serde_json::json!({
            "email": "admin@example.com",
            "password": "password",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access": "access-1",
            "refresh": "refresh-1",
            "user": admin_user_json(),
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"message": "bad credentials"})),
        )
        .mount(server)
        .await;
}
