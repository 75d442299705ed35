//! Service configuration, read from the environment with sane defaults.

use std::net::SocketAddr;
use std::time::Duration;

/// Runtime configuration for the service binary.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Socket the HTTP server binds to.
    pub bind_addr: SocketAddr,

    /// Secret used to sign and verify bearer tokens.
    pub token_secret: String,

    /// Bearer token lifetime in hours.
    pub token_ttl_hours: i64,

    /// Upper bound on a single payment-handler invocation.
    pub handler_timeout: Duration,
}

impl ServiceConfig {
    /// Read configuration from `TILL_*` environment variables, falling back
    /// to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env_parsed("TILL_ADDR").unwrap_or(defaults.bind_addr),
            token_secret: std::env::var("TILL_TOKEN_SECRET").unwrap_or(defaults.token_secret),
            token_ttl_hours: env_parsed("TILL_TOKEN_TTL_HOURS").unwrap_or(defaults.token_ttl_hours),
            handler_timeout: env_parsed("TILL_HANDLER_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.handler_timeout),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            token_secret: "your-secret-key".to_string(),
            token_ttl_hours: 24,
            handler_timeout: Duration::from_secs(30),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = ServiceConfig::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.handler_timeout, Duration::from_secs(30));
        assert!(!config.token_secret.is_empty());
    }
}
