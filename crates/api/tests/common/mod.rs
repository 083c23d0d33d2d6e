//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use clubdesk_api::auth::jwt::{issue_token, JwtConfig};
use clubdesk_api::config::ServerConfig;
use clubdesk_api::state::AppState;
use clubdesk_db::models::user::{CreateUser, User};
use clubdesk_db::repositories::UserRepo;
use clubdesk_events::EventBus;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. Mirrors the production assembly in `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
    };
    clubdesk_api::build_app_router(state, &config)
}

/// Capability grants for [`seed_user`].
#[derive(Default)]
pub struct Grants {
    pub approve_projects: bool,
    pub approve_item_requests: bool,
    pub manage_inventory: bool,
    pub approve_reimbursements: bool,
}

/// Insert a user row directly through the repository.
pub async fn seed_user(pool: &PgPool, name: &str, role: Option<&str>, grants: Grants) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: format!("{name}@club.test"),
            name: name.to_string(),
            role: role.map(str::to_string),
            can_approve_projects: grants.approve_projects,
            can_approve_item_requests: grants.approve_item_requests,
            can_manage_inventory: grants.manage_inventory,
            can_approve_reimbursements: grants.approve_reimbursements,
        },
    )
    .await
    .expect("failed to seed user")
}

/// Mint a Bearer token for the given user, signed with the test secret.
pub fn token_for(user: &User) -> String {
    issue_token(user.id, &user.role, &test_config().jwt).expect("failed to issue test token")
}

/// Send a request and return the raw response.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// GET without authentication.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

/// GET with a Bearer token.
pub async fn get_authed(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

/// POST a JSON body with a Bearer token.
pub async fn post_authed(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// Collect the response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body was not valid JSON")
}

/// Assert a status and return the JSON body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
