use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use thiserror::Error;

use super::{Claims, TokenKind, TokenPayload};
use crate::config::SecurityConfig;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token encoding failed: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

/// Outcome of a failed decode. Authenticators switch on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("token expired")]
    Expired,
    #[error("malformed token: {0}")]
    Malformed(String),
}

#[derive(Clone)]
struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// HS256 encoder/decoder holding one signing key per token kind
#[derive(Clone)]
pub struct TokenCodec {
    access: SigningKeys,
    refresh: SigningKeys,
    shared_secret: bool,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("shared_secret", &self.shared_secret)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        Self {
            access: SigningKeys::from_secret(access_secret),
            refresh: SigningKeys::from_secret(refresh_secret),
            shared_secret: access_secret == refresh_secret,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        let access = security.access_token_secret.expose_secret();
        let refresh = security.resolved_refresh_secret().expose_secret();
        Self::new(access.as_bytes(), refresh.as_bytes())
    }

    /// True when both kinds are signed with the same secret.
    pub fn uses_shared_secret(&self) -> bool {
        self.shared_secret
    }

    pub fn encode(&self, subject_id: &str, kind: TokenKind, ttl: Duration) -> Result<String, TokenError> {
        self.encode_at(subject_id, kind, ttl, Utc::now())
    }

    pub fn encode_at(
        &self,
        subject_id: &str,
        kind: TokenKind,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(subject_id, kind, ttl, now);
        let header = Header::new(Algorithm::HS256);
        Ok(encode(&header, &claims, &self.keys(kind).encoding)?)
    }

    /// Decode a token presented in `context`. The returned payload may carry
    /// the other kind; enforcing the kind is left to the caller.
    pub fn decode(&self, token: &str, context: TokenKind) -> Result<TokenPayload, DecodeError> {
        self.decode_at(token, context, Utc::now())
    }

    pub fn decode_at(
        &self,
        token: &str,
        context: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<TokenPayload, DecodeError> {
        let claims = match self.verify(token, context) {
            Ok(claims) => claims,
            // Authentic token of the other kind, so the caller can report a kind mismatch
            Err(err) if !self.shared_secret && matches!(err.kind(), ErrorKind::InvalidSignature) => {
                match self.verify(token, context.other()) {
                    Ok(claims) if claims.kind == context.other() => claims,
                    _ => return Err(DecodeError::Malformed(err.to_string())),
                }
            }
            Err(err) => return Err(DecodeError::Malformed(err.to_string())),
        };

        if now.timestamp() > claims.exp {
            return Err(DecodeError::Expired);
        }

        let issued_at = DateTime::from_timestamp(claims.iat, 0)
            .ok_or_else(|| DecodeError::Malformed("iat out of range".to_string()))?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| DecodeError::Malformed("exp out of range".to_string()))?;

        Ok(TokenPayload {
            subject_id: claims.sub,
            kind: claims.kind,
            issued_at,
            expires_at,
            token_id: claims.jti,
        })
    }

    fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.keys(kind).decoding, &Self::validation()).map(|data| data.claims)
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    fn validation() -> Validation {
        // Expiry is checked against the caller's clock in decode_at
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}
