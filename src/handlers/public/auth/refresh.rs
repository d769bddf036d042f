// handlers/public/auth/refresh.rs - POST /auth/refresh handler

use axum::{
    extract::{Extension, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::IntoResponse,
};
use serde::Serialize;

use crate::app::AppState;
use crate::auth::{cookie::refresh_cookie, TokenKind};
use crate::database::Subject;
use crate::error::{AuthError, AuthFailure};
use crate::middleware::{ApiResponse, RefreshingUser};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: Subject,
}

/// POST /auth/refresh - Rotate the token pair
///
/// Runs after [`crate::middleware::authenticate_refresh`] has validated the
/// `refreshToken` cookie. Issues a new access/refresh pair, returns both in
/// the body and replaces the cookie. The presented refresh token is not
/// revoked; it stays valid until its own expiry.
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "accessToken": "eyJhbGciOiJIUzI1NiI...",
///     "refreshToken": "eyJhbGciOiJIUzI1NiI...",
///     "expiresIn": 900,
///     "user": { "id": "u1", "email": "...", "name": "...", "isActive": true }
///   }
/// }
/// ```
pub async fn refresh_post(
    State(state): State<AppState>,
    Extension(RefreshingUser(user)): Extension<RefreshingUser>,
) -> Result<impl IntoResponse, AuthError> {
    let pair = state.issuer.issue(&user.id).map_err(|e| {
        tracing::error!("Token issuance failed for subject '{}': {}", user.id, e);
        AuthError::new(TokenKind::Refresh, AuthFailure::Internal)
    })?;

    let cookie = refresh_cookie(&pair.refresh_token, pair.refresh_expires_in, state.cookie_secure).map_err(|e| {
        tracing::error!("Failed to build refresh cookie: {}", e);
        AuthError::new(TokenKind::Refresh, AuthFailure::Internal)
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);

    tracing::info!("Rotated token pair for subject '{}'", user.id);

    let body = RefreshResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        expires_in: pair.access_expires_in,
        user: Subject::from(user),
    };

    Ok((headers, ApiResponse::success(body)))
}
