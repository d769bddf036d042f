use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::verify::{resolve_subject, verify_claims};
use crate::auth::{TokenCodec, TokenKind};
use crate::database::{Subject, UserStore};
use crate::error::{AuthError, AuthFailure};

/// Validates bearer access tokens and resolves the subject they name
#[derive(Clone)]
pub struct RequestAuthenticator {
    codec: Arc<TokenCodec>,
    users: Arc<dyn UserStore>,
}

impl RequestAuthenticator {
    pub fn new(codec: Arc<TokenCodec>, users: Arc<dyn UserStore>) -> Self {
        Self { codec, users }
    }

    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Subject, AuthError> {
        let token = bearer_token(headers).ok_or(AuthError::access(AuthFailure::MissingToken))?;
        let payload = verify_claims(&self.codec, &token, TokenKind::Access)?;
        let lookup = self.users.find_subject_by_id(&payload.subject_id);
        resolve_subject(lookup, &payload.subject_id, TokenKind::Access, |subject: &Subject| subject.is_active).await
    }
}

/// Access-token middleware; injects [`Subject`] into the request extensions
pub async fn authenticate_request(
    State(authenticator): State<RequestAuthenticator>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let subject = authenticator.authenticate(request.headers()).await?;

    tracing::debug!("Authenticated request for subject '{}'", subject.id);
    request.extensions_mut().insert(subject);

    Ok(next.run(request).await)
}

/// Extract token from `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.trim().strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
