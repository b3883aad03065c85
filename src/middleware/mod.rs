//! Request gates.
//!
//! - [`auth`]: session token extraction ([`auth::AuthUser`]) and the loaded
//!   caller record ([`auth::CurrentUser`])
//! - [`role`]: role predicates as extractors and a router-level admin gate
//! - [`rate_limit`]: per-IP token buckets
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. `AuthUser` verifies the JWT (401 on failure)
//! 3. `CurrentUser` loads the user row (401 if the user is gone)
//! 4. Role extractors check the stored role (403 on failure)

pub mod auth;
pub mod rate_limit;
pub mod role;
