//! Shared harness for HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use medistaff::{
    api::build_router,
    auth::TokenIssuer,
    config::{BootstrapAdminConfig, DatabaseConfig},
    services::StaffDirectory,
    storage::{create_pool, DbPool},
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-with-32-plus-chars";
pub const ADMIN_EMAIL: &str = "admin@hospital.org";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestApp {
    pub pool: DbPool,
    pub issuer: Arc<TokenIssuer>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        build_router(self.pool.clone(), self.issuer.clone(), &[])
    }

    pub fn directory(&self) -> StaffDirectory {
        StaffDirectory::with_sqlx(self.pool.clone())
    }

    /// Log in as the seeded administrator and return the bearer token.
    pub async fn admin_token(&self) -> String {
        self.login_token(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    pub async fn login_token(&self, email: &str, password: &str) -> String {
        let response = send_request(
            self,
            Method::POST,
            "/staff/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "login as {} failed", email);
        let body: Value = read_json(response).await;
        body["token"].as_str().expect("token in login response").to_string()
    }
}

/// In-memory database with migrations applied and one administrator seeded.
pub async fn setup_test_app() -> TestApp {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        auto_migrate: true,
        ..Default::default()
    };
    seeded_app(config).await
}

/// File-backed WAL database behind a multi-connection pool, as `serve` runs it.
///
/// Keep the returned directory alive for the duration of the test.
pub async fn setup_file_test_app() -> (TempDir, TestApp) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("medistaff.db").display()),
        max_connections: 8,
        auto_migrate: true,
        ..Default::default()
    };
    (dir, seeded_app(config).await)
}

async fn seeded_app(config: DatabaseConfig) -> TestApp {
    let pool = create_pool(&config).await.expect("create sqlite pool");

    StaffDirectory::with_sqlx(pool.clone())
        .bootstrap_admin(&BootstrapAdminConfig {
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        })
        .await
        .expect("seed administrator");

    TestApp { pool, issuer: Arc::new(TokenIssuer::new(TEST_SECRET.as_bytes())) }
}

pub async fn send_request(
    app: &TestApp,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    send_to(app.router(), method, path, token, body).await
}

/// Like [`send_request`] but against an existing router, so it can be moved into a task.
pub async fn send_to(
    router: Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = if let Some(json) = body {
        let bytes = serde_json::to_vec(&json).expect("serialize body");
        builder
            .header("content-type", "application/json")
            .body(Body::from(bytes))
            .expect("build request")
    } else {
        builder.body(Body::empty()).expect("build request")
    };

    router.oneshot(request).await.expect("request")
}

pub async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes =
        to_bytes(response.into_body(), usize::MAX).await.expect("read response body as bytes");
    serde_json::from_slice(&bytes).expect("parse json response")
}

pub fn nurse_body(email: &str) -> Value {
    json!({
        "firstName": "Joy",
        "lastName": "Tanaka",
        "email": email,
        "password": "secret123",
        "role": "nurse",
        "department": "ICU",
        "contactNumber": "555-0100"
    })
}
