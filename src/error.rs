// HTTP-facing authentication errors
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::{DecodeError, TokenKind};

/// Why a credential was rejected, independent of which token path saw it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    // 401 Unauthorized
    MissingToken,
    Expired,
    Invalid,
    WrongKind,
    UserNotFound,

    // 500 Internal Server Error
    Internal,
}

/// Authentication failure on the access (`context = Access`) or refresh path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthError {
    pub context: TokenKind,
    pub failure: AuthFailure,
}

impl AuthError {
    pub fn new(context: TokenKind, failure: AuthFailure) -> Self {
        Self { context, failure }
    }

    pub fn access(failure: AuthFailure) -> Self {
        Self::new(TokenKind::Access, failure)
    }

    pub fn refresh(failure: AuthFailure) -> Self {
        Self::new(TokenKind::Refresh, failure)
    }

    pub fn from_decode(context: TokenKind, err: &DecodeError) -> Self {
        match err {
            DecodeError::Expired => Self::new(context, AuthFailure::Expired),
            DecodeError::Malformed(_) => Self::new(context, AuthFailure::Invalid),
        }
    }

    /// True for server faults rather than credential faults.
    pub fn is_server_fault(&self) -> bool {
        self.failure == AuthFailure::Internal
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self.failure {
            AuthFailure::Internal => 500,
            _ => 401,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match (self.context, self.failure) {
            (TokenKind::Access, AuthFailure::MissingToken) => "NO_TOKEN",
            (TokenKind::Access, AuthFailure::Expired) => "TOKEN_EXPIRED",
            (TokenKind::Access, AuthFailure::Invalid) => "INVALID_TOKEN",
            (TokenKind::Access, AuthFailure::WrongKind) => "INVALID_TOKEN_TYPE",
            (TokenKind::Access, AuthFailure::Internal) => "AUTH_ERROR",
            (TokenKind::Refresh, AuthFailure::MissingToken) => "NO_REFRESH_TOKEN",
            (TokenKind::Refresh, AuthFailure::Expired) => "REFRESH_TOKEN_EXPIRED",
            (TokenKind::Refresh, AuthFailure::Invalid) => "INVALID_REFRESH_TOKEN",
            (TokenKind::Refresh, AuthFailure::WrongKind) => "INVALID_REFRESH_TOKEN_TYPE",
            (TokenKind::Refresh, AuthFailure::Internal) => "REFRESH_ERROR",
            (_, AuthFailure::UserNotFound) => "USER_NOT_FOUND",
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &'static str {
        match (self.context, self.failure) {
            (TokenKind::Access, AuthFailure::MissingToken) => "Access token required",
            (TokenKind::Access, AuthFailure::Expired) => "Access token expired",
            (TokenKind::Access, AuthFailure::Invalid) => "Invalid access token",
            (TokenKind::Access, AuthFailure::WrongKind) => "Invalid token type",
            (TokenKind::Access, AuthFailure::Internal) => "Authentication failed",
            (TokenKind::Refresh, AuthFailure::MissingToken) => "Refresh token required",
            (TokenKind::Refresh, AuthFailure::Expired) => "Refresh token expired",
            (TokenKind::Refresh, AuthFailure::Invalid) => "Invalid refresh token",
            (TokenKind::Refresh, AuthFailure::WrongKind) => "Invalid refresh token type",
            (TokenKind::Refresh, AuthFailure::Internal) => "Token refresh failed",
            (_, AuthFailure::UserNotFound) => "User not found or inactive",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": self.message(),
            "code": self.error_code()
        })
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message(), self.error_code())
    }
}

impl std::error::Error for AuthError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
