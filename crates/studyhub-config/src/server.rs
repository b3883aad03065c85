use std::env;

/// Listener ports and the optional bootstrap admin account.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub metrics_port: u16,
    /// When both are set, startup ensures this admin account exists.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            metrics_port: env::var("METRICS_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(9090),
            admin_email: env::var("ADMIN_EMAIL").ok().filter(|s| !s.is_empty()),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
        }
    }

    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_admin_requires_both_values() {
        let mut config = ServerConfig {
            port: 3000,
            metrics_port: 9090,
            admin_email: Some("admin@studyhub.local".to_string()),
            admin_password: None,
        };
        assert!(config.bootstrap_admin().is_none());

        config.admin_password = Some("changeme123".to_string());
        assert_eq!(
            config.bootstrap_admin(),
            Some(("admin@studyhub.local", "changeme123"))
        );
    }
}
