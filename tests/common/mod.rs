use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use studyhub::router::init_router;
use studyhub::state::AppState;
use studyhub::studyhub_auth::create_access_token;
use studyhub::studyhub_config::{CorsConfig, EmailConfig, JwtConfig, RateLimitConfig};
use studyhub::studyhub_core::{generate_token, hash_password};
use studyhub::studyhub_models::ids::UserId;
use studyhub::studyhub_models::users::Role;

pub const TEST_PASSWORD: &str = "password123";

#[allow(dead_code)]
pub struct TestUser {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn test_state(pool: PgPool, rate_limit_config: RateLimitConfig) -> AppState {
    AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        email_config: EmailConfig {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@studyhub.local".to_string(),
            from_name: "Study Resource".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
        },
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        rate_limit_config,
    }
}

pub fn setup_test_app(pool: PgPool) -> Router {
    init_router(test_state(pool, RateLimitConfig::disabled()))
}

/// Inserts a user directly. `scope` is `(section, batch, semester)`.
pub async fn create_test_user(
    pool: &PgPool,
    full_name: &str,
    role: Role,
    scope: Option<(&str, &str, &str)>,
    verified: bool,
) -> TestUser {
    let email = generate_unique_email();
    let hashed = hash_password(TEST_PASSWORD).unwrap();
    let (section, batch, semester) = match scope {
        Some((s, b, m)) => (Some(s), Some(b), Some(m)),
        None => (None, None, None),
    };

    let id: UserId = sqlx::query_scalar(
        "INSERT INTO users (full_name, email, password, role, section, batch, semester, is_verified)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING id",
    )
    .bind(full_name)
    .bind(&email)
    .bind(&hashed)
    .bind(role)
    .bind(section)
    .bind(batch)
    .bind(semester)
    .bind(verified)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        full_name: full_name.to_string(),
        email,
        password: TEST_PASSWORD.to_string(),
        role,
    }
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Session token for `user`, signed with the test secret.
pub fn token_for(user: &TestUser) -> String {
    create_access_token(
        user.id.into_inner(),
        &user.email,
        user.role,
        &test_jwt_config(),
    )
    .unwrap()
}

/// Stores a fresh token hash in `column_prefix`_token_hash and returns the raw token.
#[allow(dead_code)]
pub async fn plant_token(
    pool: &PgPool,
    user_id: UserId,
    column_prefix: &str,
    expires_in: Duration,
) -> String {
    let token = generate_token();
    let sql = format!(
        "UPDATE users SET {p}_token_hash = $1, {p}_token_expires_at = $2 WHERE id = $3",
        p = column_prefix
    );
    sqlx::query(&sql)
        .bind(&token.hash)
        .bind(Utc::now() + expires_in)
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
    token.raw
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, body)
}
