#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use backoffice_core::roles::Role;
use backoffice_db::models::user::{CreateUser, User};
use backoffice_db::repositories::UserRepo;
use backoffice_events::EventBus;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use backoffice_api::auth::jwt::{generate_access_token, JwtConfig};
use backoffice_api::auth::password::hash_password;
use backoffice_api::config::{ServerConfig, StorageConfig};
use backoffice_api::router::build_app_router;
use backoffice_api::state::AppState;
use backoffice_api::storage::LocalAttachmentStore;

/// Password given to every user made by [`create_user`].
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Public base URL attachments are reported under in tests.
pub const TEST_FILES_BASE: &str = "http://localhost/files";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-do-not-use-in-production".to_string(),
        access_token_expiry_mins: 15,
        refresh_token_expiry_days: 7,
    }
}

/// Build a test `ServerConfig` with safe defaults and a fresh attachment
/// directory under the system temp dir.
pub fn test_config() -> ServerConfig {
    let root = std::env::temp_dir().join(format!("backoffice-test-{}", uuid::Uuid::new_v4()));
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: test_jwt_config(),
        storage: StorageConfig {
            root,
            public_base_url: TEST_FILES_BASE.to_string(),
        },
    }
}

pub fn build_test_state(pool: PgPool, config: &ServerConfig) -> AppState {
    AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
        attachments: Arc::new(LocalAttachmentStore::new(
            config.storage.root.clone(),
            config.storage.public_base_url.clone(),
        )),
    }
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = build_test_state(pool, &config);
    build_app_router(state, &config)
}

/// Like [`build_test_app`], also returning the state so tests can reach the
/// event bus and storage directory.
pub fn build_test_app_with_state(pool: PgPool) -> (Router, AppState) {
    let config = test_config();
    let state = build_test_state(pool, &config);
    (build_app_router(state.clone(), &config), state)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Insert a user holding `roles`, with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, roles: &[Role]) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
    };
    UserRepo::create_with_roles(pool, &input, roles)
        .await
        .expect("user creation should succeed")
}

/// Access token for `user_id` carrying `roles`, signed with the test secret.
pub fn token_for(user_id: i64, roles: &[Role]) -> String {
    generate_access_token(user_id, roles, &test_jwt_config()).expect("token generation")
}

/// Create a user with `roles` and return a bearer token for them.
pub async fn user_token(pool: &PgPool, username: &str, roles: &[Role]) -> String {
    let user = create_user(pool, username, roles).await;
    token_for(user.id, roles)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        bytes: &'a [u8],
    },
}

const BOUNDARY: &str = "----backoffice-test-boundary";

pub async fn post_multipart_auth(app: Router, uri: &str, token: &str, parts: &[Part<'_>]) -> Response {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Assert `response` has `status` and return its JSON body.
pub async fn expect_json(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
