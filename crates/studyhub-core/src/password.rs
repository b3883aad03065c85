use std::sync::LazyLock;

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash("studyhub-no-such-account", DEFAULT_COST).ok());

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

/// Runs one bcrypt verification against a fixed hash and discards the result,
/// so a login for an unknown account costs the same as a wrong password.
pub fn verify_dummy_password(password: &str) {
    if let Some(dummy) = DUMMY_HASH.as_deref() {
        let _ = verify(password, dummy);
    }
}
