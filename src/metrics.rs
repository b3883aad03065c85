//! Prometheus metrics.
//!
//! HTTP metrics are recorded by [`metrics_middleware`]; business counters by
//! the `track_*` helpers called from services. The exporter is served by a
//! separate listener built from [`metrics_app`].

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Reads `OBSERVABILITY_ENABLED` once; enabled unless set to `false` or `0`.
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true)
    })
}

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// Installs the Prometheus recorder and its upkeep task.
///
/// Returns `None` when observability is disabled or a recorder is already
/// installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if !is_observability_enabled() {
        return None;
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            LATENCY_BUCKETS,
        )
        .and_then(|builder| builder.install_recorder())
        .map_err(|e| tracing::warn!(error = %e, "Prometheus recorder not installed"))
        .ok()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Some(handle)
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let uri_path = req.uri().path().to_owned();

    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or(uri_path);

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    let status_category = match status {
        200..=299 => "2xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    };
    counter!("http_requests_by_status", "status_category" => status_category).increment(1);

    gauge!("http_requests_active").decrement(1.0);

    response
}

pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Business metrics

pub fn track_user_registered() {
    if !is_observability_enabled() {
        return;
    }
    counter!("users_registered_total").increment(1);
}

pub fn track_user_login_success(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_logins_total", "role" => role.to_string(), "status" => "success").increment(1);
}

pub fn track_user_login_failure(reason: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_logins_total", "role" => "unknown", "status" => "failure", "reason" => reason)
        .increment(1);
}

pub fn track_jwt_issued() {
    if !is_observability_enabled() {
        return;
    }
    counter!("jwt_tokens_issued_total").increment(1);
}

pub fn track_email_sent(kind: &'static str, success: bool) {
    if !is_observability_enabled() {
        return;
    }
    let status = if success { "success" } else { "failure" };
    counter!("emails_sent_total", "kind" => kind, "status" => status).increment(1);
}

pub fn track_course_created() {
    if !is_observability_enabled() {
        return;
    }
    counter!("courses_created_total").increment(1);
}

/// `outcome` is `enrolled`, `already_enrolled` or `incorrect_password`.
pub fn track_enrollment(outcome: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("course_enrollments_total", "outcome" => outcome).increment(1);
}

pub fn track_resource_created(subject: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("resources_created_total", "subject" => subject.to_string()).increment(1);
}

pub fn track_role_changed(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_role_changes_total", "role" => role.to_string()).increment(1);
}

pub fn track_rate_limited(bucket: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("rate_limited_requests_total", "bucket" => bucket).increment(1);
}
