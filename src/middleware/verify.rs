use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::auth::{TokenCodec, TokenKind, TokenPayload};
use crate::database::StoreError;
use crate::error::{AuthError, AuthFailure};

/// Decode and kind check shared by both authenticators.
///
/// `context` selects the signing secret, the kind that must be present and
/// the error codes reported.
pub(crate) fn verify_claims(codec: &TokenCodec, token: &str, context: TokenKind) -> Result<TokenPayload, AuthError> {
    let payload = codec.decode(token, context).map_err(|e| {
        tracing::debug!("Rejected {} token: {}", context, e);
        AuthError::from_decode(context, &e)
    })?;

    if payload.kind != context {
        tracing::warn!(
            "Rejected {} token presented where a {} token is required (subject '{}')",
            payload.kind,
            context,
            payload.subject_id
        );
        return Err(AuthError::new(context, AuthFailure::WrongKind));
    }

    Ok(payload)
}

/// Await a user-store lookup and require an active subject.
///
/// Store errors and panics raised while resolving the subject both become
/// `Internal` for `context`; neither detail reaches the client.
pub(crate) async fn resolve_subject<T, F>(
    lookup: F,
    subject_id: &str,
    context: TokenKind,
    is_active: fn(&T) -> bool,
) -> Result<T, AuthError>
where
    F: Future<Output = Result<Option<T>, StoreError>>,
{
    let user = match AssertUnwindSafe(lookup).catch_unwind().await {
        Ok(Ok(user)) => user,
        Ok(Err(e)) => {
            tracing::error!("User store error resolving subject '{}': {}", subject_id, e);
            return Err(AuthError::new(context, AuthFailure::Internal));
        }
        Err(panic) => {
            tracing::error!(
                "User store panicked resolving subject '{}': {}",
                subject_id,
                panic_message(panic.as_ref())
            );
            return Err(AuthError::new(context, AuthFailure::Internal));
        }
    };

    match user {
        Some(user) if is_active(&user) => Ok(user),
        Some(_) => {
            tracing::warn!("Subject '{}' is deactivated", subject_id);
            Err(AuthError::new(context, AuthFailure::UserNotFound))
        }
        None => {
            tracing::warn!("Subject '{}' no longer exists", subject_id);
            Err(AuthError::new(context, AuthFailure::UserNotFound))
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn lookup(found: Option<bool>) -> Result<Option<bool>, StoreError> {
        Ok(found)
    }

    async fn exploding_lookup() -> Result<Option<bool>, StoreError> {
        panic!("driver bug")
    }

    #[tokio::test]
    async fn lookup_outcomes_map_onto_failures() {
        let active = |flag: &bool| *flag;

        assert_eq!(resolve_subject(lookup(Some(true)), "u1", TokenKind::Access, active).await, Ok(true));

        let inactive = resolve_subject(lookup(Some(false)), "u1", TokenKind::Access, active).await;
        assert_eq!(inactive, Err(AuthError::access(AuthFailure::UserNotFound)));

        let missing = resolve_subject(lookup(None), "u1", TokenKind::Refresh, active).await;
        assert_eq!(missing, Err(AuthError::refresh(AuthFailure::UserNotFound)));
    }

    #[tokio::test]
    async fn panicking_lookup_is_internal_for_the_calling_path() {
        let err = resolve_subject(exploding_lookup(), "u1", TokenKind::Refresh, |flag: &bool| *flag)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::refresh(AuthFailure::Internal));
        assert_eq!(err.error_code(), "REFRESH_ERROR");
    }
}
