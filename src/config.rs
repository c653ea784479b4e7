/// Configuration management for the indieglue service
use std::env;

/// Main service configuration
#[derive(Debug, Clone)]
pub struct GlueConfig {
    pub service: ServiceConfig,
    pub cache: CacheConfig,
    pub fetch: FetchConfig,
}

/// Service-level configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
}

/// Cache backend configuration
///
/// When `redis_url` is set the shared Redis backend is used; otherwise the
/// in-process map backend is used (process-lifetime state, nothing persisted).
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub redis_url: Option<String>,
}

/// Outbound fetch configuration
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User-Agent header for origin requests
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("indieglue/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 10,
        }
    }
}

impl GlueConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let service = ServiceConfig {
            hostname: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        };

        let cache = CacheConfig {
            redis_url: env::var("REDIS_URL").ok().filter(|s| !s.is_empty()),
        };

        let fetch = FetchConfig {
            user_agent: env::var("FETCH_USER_AGENT")
                .unwrap_or_else(|_| FetchConfig::default().user_agent),
            timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        };

        Self {
            service,
            cache,
            fetch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert!(config.user_agent.starts_with("indieglue/"));
        assert_eq!(config.timeout_secs, 10);
    }
}
