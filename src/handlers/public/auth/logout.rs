// handlers/public/auth/logout.rs - POST /auth/logout handler

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
};

use crate::app::AppState;
use crate::auth::cookie::clear_refresh_cookie;

/// POST /auth/logout - Drop the refresh cookie
///
/// Stateless: tokens already handed out stay valid until they expire.
pub async fn logout_post(State(state): State<AppState>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    // Always clear the cookie, even when none was sent
    match clear_refresh_cookie(state.cookie_secure) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(e) => tracing::error!("Failed to build cleared refresh cookie: {}", e),
    }
    (StatusCode::NO_CONTENT, headers)
}
