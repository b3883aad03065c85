//! Shared utilities.
//!
//! - [`email`]: SMTP delivery of verification and password reset emails

pub mod email;
