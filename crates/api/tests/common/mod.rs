#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use caretrack_api::auth::jwt::{generate_access_token, JwtConfig};
use caretrack_api::auth::password::hash_password;
use caretrack_api::config::{LogFormat, ServerConfig};
use caretrack_api::router::build_app_router;
use caretrack_api::state::AppState;
use caretrack_core::access::Actor;
use caretrack_core::request::TransitionPolicy;
use caretrack_core::roles::Role;
use caretrack_db::models::user::{CreateUser, User};
use caretrack_db::repositories::UserRepo;

pub const TEST_PASSWORD: &str = "test_password_123";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://unused-in-tests".to_string(),
        cors_origins: vec![HeaderValue::from_static("http://localhost:8081")],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_hours: 1,
        },
        transition_policy: TransitionPolicy::Permissive,
        log_format: LogFormat::Pretty,
    }
}

/// Shared state over the given pool, for tests that call the engine directly.
pub fn test_state(pool: PgPool) -> AppState {
    AppState::new(pool, test_config())
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(test_state(pool))
}

/// Same as [`build_test_app`] with a chosen transition policy.
pub fn build_test_app_with_policy(pool: PgPool, policy: TransitionPolicy) -> Router {
    let mut config = test_config();
    config.transition_policy = policy;
    build_app_router(AppState::new(pool, config))
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A stored user plus a valid bearer token for them.
pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> i64 {
        self.user.id
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.user.id, self.user.role)
    }
}

/// Insert a user directly and mint a token for them.
pub async fn create_user(pool: &PgPool, name: &str, role: Role) -> TestUser {
    let slug = name.to_lowercase().replace(' ', ".");
    let input = CreateUser {
        email: format!("{slug}@caretrack.test"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        name: name.to_string(),
        role,
        phone: None,
        address: (role == Role::Homeowner).then(|| "12 Harbour Road".to_string()),
        position: role.is_admin().then(|| "Property Manager".to_string()),
        community: role.is_admin().then(|| "Seaview".to_string()),
        profile_image: Some(format!("https://img.test/{slug}.png")),
    };
    let user = UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");
    let token = generate_access_token(user.id, user.role, &test_config().jwt)
        .expect("token generation should succeed");
    TestUser { user, token }
}

pub async fn create_homeowner(pool: &PgPool, name: &str) -> TestUser {
    create_user(pool, name, Role::Homeowner).await
}

pub async fn create_admin(pool: &PgPool, name: &str) -> TestUser {
    create_user(pool, name, Role::Admin).await
}

/// File a ticket through the API and return its JSON.
pub async fn create_ticket(app: &Router, owner: &TestUser, request_type: &str, unit: &str) -> serde_json::Value {
    let body = serde_json::json!({
        "type": request_type,
        "description": format!("{request_type} problem"),
        "unit": unit,
    });
    let response = post_json_auth(app.clone(), "/api/v1/requests", body, &owner.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(token)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), Some(token)).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, None, Some(token)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, Some(token)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// POST a body verbatim, for payloads that are not valid JSON.
pub async fn post_raw_auth(app: Router, uri: &str, body: &'static str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request should build");
    app.oneshot(request).await.expect("router is infallible")
}
