//! # StudyHub DB
//!
//! PostgreSQL connection pool and the embedded schema migrations.
//!
//! # Example
//!
//! ```ignore
//! use studyhub_db::{init_db_pool, run_migrations};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = init_db_pool().await?;
//!     run_migrations(&pool).await?;
//!     Ok(())
//! }
//! ```

use std::env;
use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Schema migrations, compiled into the binary from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Creates the connection pool from `DATABASE_URL`.
///
/// `DB_MAX_CONNECTIONS` caps the pool size (default 10).
///
/// # Errors
///
/// Returns [`sqlx::Error::Configuration`] when `DATABASE_URL` is not set, or
/// the connection error when the database is unreachable.
pub async fn init_db_pool() -> Result<PgPool, sqlx::Error> {
    let database_url = env::var("DATABASE_URL")
        .map_err(|_| sqlx::Error::Configuration("DATABASE_URL must be set".into()))?;

    let max_connections = env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await?;

    tracing::info!(max_connections, "database pool initialized");
    Ok(pool)
}

/// Applies pending migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("database migrations applied");
    Ok(())
}
