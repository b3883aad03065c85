//! # StudyHub CLI
//!
//! Administration and demo-data utilities for StudyHub.
//!
//! ## Usage
//!
//! ```ignore
//! use studyhub_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(6); // 6 cohorts with defaults
//! seed_all(&pool, config).await?;
//! ```

pub mod admin;
pub mod seeder;
