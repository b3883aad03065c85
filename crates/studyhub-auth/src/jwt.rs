//! JWT creation and verification.
//!
//! # Example
//!
//! ```ignore
//! use studyhub_auth::{create_access_token, verify_token};
//! use studyhub_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "user@example.com", Role::Student, &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use studyhub_config::JwtConfig;
use studyhub_core::AppError;
use studyhub_models::users::Role;

use crate::claims::Claims;

/// Issues an HS256 session token valid for `jwt_config.access_token_expiry` seconds.
///
/// # Errors
///
/// Returns a server error if encoding fails.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    role: Role,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies signature and expiry and returns the claims.
///
/// # Errors
///
/// Returns an unauthorized error for malformed, tampered or expired tokens.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token".to_string()))
}
