//! # StudyHub Auth
//!
//! Session token claims and JWT utilities.
//!
//! - [`claims`]: the [`Claims`] carried by a session token
//! - [`jwt`]: token creation and verification

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
