use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use super::verify::{resolve_subject, verify_claims};
use crate::auth::{cookie::refresh_token_from_headers, TokenCodec, TokenKind};
use crate::database::{UserRecord, UserStore};
use crate::error::{AuthError, AuthFailure};

/// Full user record resolved from a valid refresh token
#[derive(Clone, Debug)]
pub struct RefreshingUser(pub UserRecord);

/// Validates the refresh-token cookie ahead of the refresh endpoint
#[derive(Clone)]
pub struct RefreshAuthenticator {
    codec: Arc<TokenCodec>,
    users: Arc<dyn UserStore>,
}

impl RefreshAuthenticator {
    pub fn new(codec: Arc<TokenCodec>, users: Arc<dyn UserStore>) -> Self {
        Self { codec, users }
    }

    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<RefreshingUser, AuthError> {
        let token = refresh_token_from_headers(headers).ok_or(AuthError::refresh(AuthFailure::MissingToken))?;
        let payload = verify_claims(&self.codec, &token, TokenKind::Refresh)?;
        let lookup = self.users.find_by_id(&payload.subject_id);
        let user = resolve_subject(lookup, &payload.subject_id, TokenKind::Refresh, |user: &UserRecord| {
            user.is_active
        })
        .await?;
        Ok(RefreshingUser(user))
    }
}

/// Refresh-token middleware; injects [`RefreshingUser`] into the request extensions
pub async fn authenticate_refresh(
    State(authenticator): State<RefreshAuthenticator>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = authenticator.authenticate(request.headers()).await?;

    tracing::debug!("Refresh token accepted for subject '{}'", user.0.id);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
