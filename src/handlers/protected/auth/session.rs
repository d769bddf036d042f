use axum::extract::Extension;

use crate::database::Subject;
use crate::middleware::ApiResponse;

/// GET /api/auth/whoami - Current authenticated subject
///
/// The subject was re-read from the user store by the access-token
/// middleware on this very request, so it reflects current account state.
///
/// ```json
/// {
///   "success": true,
///   "data": { "id": "u1", "email": "ada@example.com", "name": "Ada", "isActive": true }
/// }
/// ```
pub async fn whoami(Extension(subject): Extension<Subject>) -> ApiResponse<Subject> {
    ApiResponse::success(subject)
}
