use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{TokenCodec, TokenIssuer};
use crate::config::{AppConfig, SecurityConfig};
use crate::database::UserStore;
use crate::handlers;
use crate::middleware::{authenticate_refresh, authenticate_request, RefreshAuthenticator, RequestAuthenticator};

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub codec: Arc<TokenCodec>,
    pub issuer: TokenIssuer,
    pub users: Arc<dyn UserStore>,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(codec: Arc<TokenCodec>, users: Arc<dyn UserStore>, cookie_secure: bool) -> Self {
        Self {
            issuer: TokenIssuer::new(codec.clone()),
            codec,
            users,
            cookie_secure,
        }
    }

    pub fn from_config(config: &AppConfig, users: Arc<dyn UserStore>) -> Self {
        let codec = Arc::new(TokenCodec::from_config(&config.security));
        Self::new(codec, users, config.security.cookie_secure)
    }

    pub fn request_authenticator(&self) -> RequestAuthenticator {
        RequestAuthenticator::new(self.codec.clone(), self.users.clone())
    }

    pub fn refresh_authenticator(&self) -> RefreshAuthenticator {
        RefreshAuthenticator::new(self.codec.clone(), self.users.clone())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes(&state))
        // Protected API
        .merge(auth_routes(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes(state: &AppState) -> Router<AppState> {
    use handlers::public::auth;

    let refresh = Router::new()
        .route("/auth/refresh", post(auth::refresh_post))
        .route_layer(from_fn_with_state(state.refresh_authenticator(), authenticate_refresh));

    Router::new()
        .route("/auth/logout", post(auth::logout_post))
        .merge(refresh)
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    use handlers::protected::auth;

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route_layer(from_fn_with_state(state.request_authenticator(), authenticate_request))
}

/// CORS for the dashboard frontend; credentials are allowed so the refresh cookie travels
pub fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Dashboard Auth",
            "version": version,
            "endpoints": {
                "refresh": "/auth/refresh (refreshToken cookie)",
                "logout": "/auth/logout (public)",
                "whoami": "/api/auth/whoami (bearer access token)",
                "health": "/health (public)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.users.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "userStore": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("User store health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "user store unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
