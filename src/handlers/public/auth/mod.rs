// handlers/public/auth/mod.rs - Token renewal and session teardown
//
// These routes never see an access token. `/auth/refresh` sits behind the
// refresh-token middleware; `/auth/logout` only clears the cookie.

pub mod logout;
pub mod refresh;

pub use logout::logout_post;
pub use refresh::refresh_post;
