#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use dashboard_auth::database::{InMemoryUserStore, StoreError, UserRecord, UserStore};
use dashboard_auth::{router, AppState, TokenCodec, TokenKind};
use serde_json::Value;
use tower::ServiceExt;
use tracing_subscriber::EnvFilter;

pub const ACCESS_SECRET: &[u8] = b"test-access-secret";
pub const REFRESH_SECRET: &[u8] = b"test-refresh-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub users: Arc<InMemoryUserStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn user(id: &str, is_active: bool) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        name: format!("User {id}"),
        is_active,
        password_hash: "$argon2id$v=19$not-a-real-hash".to_string(),
    }
}

/// App with distinct access/refresh secrets, an active `u1` and an inactive `u2`
pub fn spawn_app() -> TestApp {
    spawn_app_with_codec(TokenCodec::new(ACCESS_SECRET, REFRESH_SECRET))
}

pub fn spawn_app_with_codec(codec: TokenCodec) -> TestApp {
    init_tracing();
    let users = Arc::new(InMemoryUserStore::with_users([user("u1", true), user("u2", false)]));
    let state = AppState::new(Arc::new(codec), users.clone(), true);
    TestApp {
        router: router(state.clone()),
        state,
        users,
    }
}

/// Same app, but requests resolve subjects through `store`
pub fn spawn_app_with_store(store: Arc<dyn UserStore>) -> TestApp {
    let mut app = spawn_app();
    let state = AppState::new(app.state.codec.clone(), store, true);
    app.router = router(state.clone());
    app.state = state;
    app
}

/// App whose user store always fails
pub fn spawn_app_with_broken_store() -> TestApp {
    spawn_app_with_store(Arc::new(BrokenUserStore))
}

/// App whose user store panics on every lookup
pub fn spawn_app_with_panicking_store() -> TestApp {
    spawn_app_with_store(Arc::new(PanickingUserStore))
}

/// Log to the test writer; `RUST_LOG=debug cargo test` shows the authenticators' decisions
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct BrokenUserStore;

#[async_trait]
impl UserStore for BrokenUserStore {
    async fn find_by_id(&self, _id: &str) -> Result<Option<UserRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused: db-primary:5432".to_string()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused: db-primary:5432".to_string()))
    }
}

pub struct PanickingUserStore;

#[async_trait]
impl UserStore for PanickingUserStore {
    async fn find_by_id(&self, _id: &str) -> Result<Option<UserRecord>, StoreError> {
        panic!("driver bug: db-primary:5432")
    }
}

impl TestApp {
    pub fn mint_at(&self, subject: &str, kind: TokenKind, issued_at: DateTime<Utc>) -> String {
        self.state
            .codec
            .encode_at(subject, kind, kind.ttl(), issued_at)
            .expect("encode token")
    }

    pub fn mint(&self, subject: &str, kind: TokenKind) -> String {
        self.mint_at(subject, kind, Utc::now())
    }

    pub fn mint_days_ago(&self, subject: &str, kind: TokenKind, days: i64) -> String {
        self.mint_at(subject, kind, Utc::now() - Duration::days(days))
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok(TestResponse { status, headers, body })
    }

    pub async fn whoami(&self, authorization: Option<&str>) -> Result<TestResponse> {
        let mut builder = Request::builder().method("GET").uri("/api/auth/whoami");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        self.send(builder.body(Body::empty())?).await
    }

    pub async fn refresh(&self, cookie: Option<&str>) -> Result<TestResponse> {
        let mut builder = Request::builder().method("POST").uri("/auth/refresh");
        if let Some(value) = cookie {
            builder = builder.header("Cookie", value);
        }
        self.send(builder.body(Body::empty())?).await
    }
}

pub fn assert_auth_error(response: &TestResponse, status: StatusCode, code: &str) {
    assert_eq!(response.status, status, "unexpected status, body: {}", response.body);
    assert_eq!(response.body["code"], code, "unexpected body: {}", response.body);
    assert!(response.body["error"].is_string(), "missing error message: {}", response.body);
}
