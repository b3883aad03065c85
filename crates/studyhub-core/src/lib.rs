//! # StudyHub Core
//!
//! Core types, errors, and utilities for the StudyHub API.
//!
//! This crate provides foundational types used throughout the StudyHub application:
//!
//! - [`errors`]: Application error type with stable error codes and HTTP response conversion
//! - [`pagination`]: Page-based pagination utilities for list endpoints
//! - [`password`]: Password hashing and verification (bcrypt)
//! - [`tokens`]: One-time token generation and hashing for email verification and password reset
//! - [`search`]: ILIKE pattern escaping for search filters
//! - [`serde`]: Lenient query-string deserializers
//!
//! # Example
//!
//! ```ignore
//! use studyhub_core::errors::AppError;
//! use studyhub_core::pagination::PaginationParams;
//! use studyhub_core::tokens::generate_token;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Course not found"));
//!
//! let hash = hash_password("secure_password")?;
//!
//! let token = generate_token();
//! // Email `token.raw`, persist `token.hash`.
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod search;
pub mod serde;
pub mod tokens;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorKind};
pub use pagination::{PaginationParams, total_pages};
pub use password::{hash_password, verify_dummy_password, verify_password};
pub use search::like_pattern;
pub use tokens::{GeneratedToken, generate_token, hash_token};
