pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

pub use app::{router, AppState};
pub use auth::{TokenCodec, TokenIssuer, TokenKind, TokenPair, TokenPayload};
pub use error::{AuthError, AuthFailure};
