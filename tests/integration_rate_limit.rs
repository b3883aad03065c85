mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::test_state;
use studyhub::router::init_router;
use studyhub::studyhub_config::RateLimitConfig;

/// One auth request per IP, three general requests per IP.
fn strict_rate_limit_config() -> RateLimitConfig {
    RateLimitConfig {
        enabled: true,
        general_per_second: 60,
        general_burst_size: 3,
        auth_per_second: 60,
        auth_burst_size: 1,
    }
}

fn login_request(ip: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(
            serde_json::to_string(&json!({
                "email": "test@example.com",
                "password": "password123"
            }))
            .unwrap(),
        ))
        .unwrap()
}

fn resources_request(ip: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/api/resources")
        .header("x-forwarded-for", ip)
        .body(Body::empty())
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_auth_rate_limit_exceeded(pool: PgPool) {
    let app = init_router(test_state(pool, strict_rate_limit_config()));

    let response = app.clone().oneshot(login_request("192.168.1.100")).await.unwrap();
    // Processed, not limited
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.clone().oneshot(login_request("192.168.1.100")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["code"], "RATE_LIMITED");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rate_limit_is_per_ip(pool: PgPool) {
    let app = init_router(test_state(pool, strict_rate_limit_config()));

    let response = app.clone().oneshot(login_request("10.0.0.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.clone().oneshot(login_request("10.0.0.2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_general_rate_limit(pool: PgPool) {
    let app = init_router(test_state(pool, strict_rate_limit_config()));

    for _ in 0..3 {
        let response = app.clone().oneshot(resources_request("172.16.0.5")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(resources_request("172.16.0.5")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_disabled_rate_limit(pool: PgPool) {
    let app = init_router(test_state(pool, RateLimitConfig::disabled()));

    for _ in 0..5 {
        let response = app.clone().oneshot(login_request("192.168.1.200")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
