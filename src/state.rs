use sqlx::PgPool;

use studyhub_config::{CorsConfig, EmailConfig, JwtConfig, RateLimitConfig};
use studyhub_db::init_db_pool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
}

impl AppState {
    /// State for an existing pool with every config read from the environment.
    pub fn from_env(db: PgPool) -> Self {
        Self {
            db,
            jwt_config: JwtConfig::from_env(),
            email_config: EmailConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            rate_limit_config: RateLimitConfig::from_env(),
        }
    }
}

pub async fn init_app_state() -> Result<AppState, sqlx::Error> {
    let db = init_db_pool().await?;
    Ok(AppState::from_env(db))
}
