//! Rate limiting configuration for API endpoints.
//!
//! Two token buckets are configured: a general one for the whole API and a
//! stricter one for `/api/auth`, where credentials are guessed.
//!
//! # Configuration
//!
//! - `RATE_LIMIT_ENABLED`: Set to `false` to disable limiting (default: true)
//! - `RATE_LIMIT_GENERAL_PER_SECOND`: Seconds to replenish one general token (default: 2)
//! - `RATE_LIMIT_GENERAL_BURST_SIZE`: Burst size for general endpoints (default: 30)
//! - `RATE_LIMIT_AUTH_PER_SECOND`: Seconds to replenish one auth token (default: 10)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: Burst size for auth endpoints (default: 5)
//!
//! # Example
//!
//! ```ignore
//! use studyhub_config::RateLimitConfig;
//! use governor::RateLimiter;
//!
//! let config = RateLimitConfig::from_env();
//! if let Some(quota) = config.auth_quota() {
//!     let limiter = RateLimiter::keyed(quota);
//! }
//! ```

use std::env;
use std::num::NonZeroU32;
use std::time::Duration;

use governor::Quota;

/// Rate limit configuration for the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,

    /// Replenishment period for general endpoints, in seconds per token.
    pub general_per_second: u64,

    /// Maximum burst for general endpoints.
    pub general_burst_size: u32,

    /// Replenishment period for auth endpoints, in seconds per token.
    pub auth_per_second: u64,

    /// Maximum burst for auth endpoints.
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            general_per_second: 2,
            general_burst_size: 30,
            auth_per_second: 10,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    /// Falls back to default values for unset or unparsable variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env::var("RATE_LIMIT_ENABLED")
                .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(defaults.enabled),
            general_per_second: parse_var("RATE_LIMIT_GENERAL_PER_SECOND")
                .unwrap_or(defaults.general_per_second),
            general_burst_size: parse_var("RATE_LIMIT_GENERAL_BURST_SIZE")
                .unwrap_or(defaults.general_burst_size),
            auth_per_second: parse_var("RATE_LIMIT_AUTH_PER_SECOND")
                .unwrap_or(defaults.auth_per_second),
            auth_burst_size: parse_var("RATE_LIMIT_AUTH_BURST_SIZE")
                .unwrap_or(defaults.auth_burst_size),
        }
    }

    /// A config that never rejects a request. Used by tests that issue many
    /// requests from the same address.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Quota for general API endpoints, `None` when limiting is off or the
    /// values are zero.
    #[must_use]
    pub fn general_quota(&self) -> Option<Quota> {
        self.quota(self.general_per_second, self.general_burst_size)
    }

    /// Quota for `/api/auth` endpoints.
    #[must_use]
    pub fn auth_quota(&self) -> Option<Quota> {
        self.quota(self.auth_per_second, self.auth_burst_size)
    }

    fn quota(&self, per_second: u64, burst_size: u32) -> Option<Quota> {
        if !self.enabled || per_second == 0 {
            return None;
        }
        let burst = NonZeroU32::new(burst_size)?;
        Quota::with_period(Duration::from_secs(per_second)).map(|q| q.allow_burst(burst))
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.general_per_second, 2);
        assert_eq!(config.general_burst_size, 30);
        assert_eq!(config.auth_per_second, 10);
        assert_eq!(config.auth_burst_size, 5);
    }

    #[test]
    fn test_quotas_follow_burst_size() {
        let config = RateLimitConfig::default();
        let general = config.general_quota().unwrap();
        let auth = config.auth_quota().unwrap();
        assert_eq!(general.burst_size().get(), 30);
        assert_eq!(auth.burst_size().get(), 5);
        assert_eq!(auth.replenish_interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_disabled_config_has_no_quota() {
        let config = RateLimitConfig::disabled();
        assert!(config.general_quota().is_none());
        assert!(config.auth_quota().is_none());
    }

    #[test]
    fn test_zero_values_have_no_quota() {
        let config = RateLimitConfig {
            auth_burst_size: 0,
            general_per_second: 0,
            ..RateLimitConfig::default()
        };
        assert!(config.general_quota().is_none());
        assert!(config.auth_quota().is_none());
    }
}
