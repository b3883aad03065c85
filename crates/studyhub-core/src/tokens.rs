//! One-time tokens for email verification and password reset.
//!
//! The raw token is 32 random bytes, hex-encoded, and only ever leaves the
//! server inside an email link. The database stores the SHA-256 digest.

use rand::RngCore;
use sha2::{Digest, Sha256};

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone)]
pub struct GeneratedToken {
    /// Sent to the user; never persisted.
    pub raw: String,
    /// Persisted; compared against `hash_token(raw)` on redemption.
    pub hash: String,
}

pub fn generate_token() -> GeneratedToken {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    let raw = hex::encode(bytes);
    let hash = hash_token(&raw);
    GeneratedToken { raw, hash }
}

pub fn hash_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
