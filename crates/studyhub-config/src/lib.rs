//! # StudyHub Config
//!
//! Configuration types for the StudyHub API, loaded from environment
//! variables:
//!
//! - [`jwt`]: session token configuration
//! - [`cors`]: allowed browser origins
//! - [`email`]: SMTP settings and email link targets
//! - [`rate_limit`]: API rate limiting
//! - [`server`]: listener ports and the bootstrap admin
//!
//! # Example
//!
//! ```ignore
//! use studyhub_config::{CorsConfig, EmailConfig, JwtConfig, RateLimitConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let email_config = EmailConfig::from_env();
//! let rate_limit_config = RateLimitConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod email;
pub mod jwt;
pub mod rate_limit;
pub mod server;

pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
