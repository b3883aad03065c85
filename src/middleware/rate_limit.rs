//! Per-IP rate limiting.
//!
//! Clients are keyed by [`SmartIpKeyExtractor`], which honours
//! `X-Forwarded-For`, `X-Real-IP` and `Forwarded` before falling back to the
//! peer address. Requests whose address cannot be determined are not limited.

use std::net::IpAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tower_governor::key_extractor::{KeyExtractor, SmartIpKeyExtractor};

use studyhub_core::AppError;

use crate::metrics::track_rate_limited;

#[derive(Clone)]
pub struct IpRateLimiter {
    bucket: &'static str,
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
}

impl IpRateLimiter {
    pub fn new(bucket: &'static str, quota: Quota) -> Self {
        Self {
            bucket,
            limiter: Arc::new(RateLimiter::keyed(quota)),
        }
    }

    /// Consumes one token for `ip`; `false` when the bucket is empty.
    pub fn check(&self, ip: IpAddr) -> bool {
        self.limiter.check_key(&ip).is_ok()
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<IpRateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    if let Ok(ip) = SmartIpKeyExtractor.extract(&req)
        && !limiter.check(ip)
    {
        tracing::warn!(bucket = limiter.bucket, %ip, "rate limit exceeded");
        track_rate_limited(limiter.bucket);
        return AppError::rate_limited().into_response();
    }

    next.run(req).await
}

/// Wraps `router` in a limiter for `quota`, or returns it unchanged when
/// limiting is off.
pub fn limit<S>(router: Router<S>, bucket: &'static str, quota: Option<Quota>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    match quota {
        Some(quota) => router.layer(middleware::from_fn_with_state(
            IpRateLimiter::new(bucket, quota),
            rate_limit_middleware,
        )),
        None => router,
    }
}
