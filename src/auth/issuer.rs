use std::sync::Arc;

use serde::Serialize;

use super::{TokenCodec, TokenError, TokenKind};

/// A freshly minted access/refresh pair. Expiry values are in seconds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_in: i64,
    pub refresh_expires_in: i64,
}

/// Mints token pairs. Callers are trusted to have authenticated the subject.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
}

impl TokenIssuer {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    pub fn issue(&self, subject_id: &str) -> Result<TokenPair, TokenError> {
        let access_ttl = TokenKind::Access.ttl();
        let refresh_ttl = TokenKind::Refresh.ttl();

        let access_token = self.codec.encode(subject_id, TokenKind::Access, access_ttl)?;
        let refresh_token = self.codec.encode(subject_id, TokenKind::Refresh, refresh_ttl)?;

        tracing::debug!("Issued token pair for subject '{}'", subject_id);

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_in: access_ttl.num_seconds(),
            refresh_expires_in: refresh_ttl.num_seconds(),
        })
    }
}
