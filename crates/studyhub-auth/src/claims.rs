//! Session token claims.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use studyhub_models::users::Role;

/// Claims carried by a session token.
///
/// `role` reflects the user's role at login time; authorization decisions
/// reload the user row, so a role change takes effect on the next request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}
