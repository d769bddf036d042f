pub mod auth;
pub mod refresh;
pub mod response;
mod verify;

pub use auth::{authenticate_request, RequestAuthenticator};
pub use refresh::{authenticate_refresh, RefreshAuthenticator, RefreshingUser};
pub use response::ApiResponse;
