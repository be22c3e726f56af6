//! Configuration Module
//!
//! Handles loading and managing cache and server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the local cache can hold
    pub max_size: usize,
    /// Default TTL in seconds for entries set without an explicit TTL
    pub default_ttl: u64,
    /// Connection string of the optional remote mirror; None disables it
    pub redis_url: Option<String>,
    /// Connect/read/write timeout for remote mirror calls, in milliseconds
    pub redis_timeout_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Dashboard warm-up interval in seconds, 0 disables warm-up
    pub warmup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL` - Default TTL in seconds, must be positive (default: 3600)
    /// - `REDIS_URL` - Remote mirror connection string (default: unset)
    /// - `REDIS_TIMEOUT_MS` - Remote mirror timeout (default: 500)
    /// - `SERVER_PORT` - HTTP server port (default: 8050)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    /// - `WARMUP_INTERVAL` - Dashboard warm-up frequency in seconds (default: 600)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_size: env_or("CACHE_MAX_SIZE", defaults.max_size),
            default_ttl: Some(env_or("CACHE_TTL", defaults.default_ttl))
                .filter(|ttl| *ttl > 0)
                .unwrap_or(defaults.default_ttl),
            redis_url: env::var("REDIS_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            redis_timeout_ms: env_or("REDIS_TIMEOUT_MS", defaults.redis_timeout_ms),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            warmup_interval: env_or("WARMUP_INTERVAL", defaults.warmup_interval),
        }
    }

    /// Remote mirror timeout as a Duration.
    pub fn redis_timeout(&self) -> Duration {
        Duration::from_millis(self.redis_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_size: 1000,
            default_ttl: 3600,
            redis_url: None,
            redis_timeout_ms: 500,
            server_port: 8050,
            cleanup_interval: 60,
            warmup_interval: 600,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_size, 1000);
        assert_eq!(config.default_ttl, 3600);
        assert!(config.redis_url.is_none());
        assert_eq!(config.redis_timeout(), Duration::from_millis(500));
        assert_eq!(config.server_port, 8050);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.warmup_interval, 600);
    }

    #[test]
    fn test_env_or_parses_and_falls_back() {
        env::set_var("DASH_CACHE_TEST_NUMBER", " 42 ");
        env::set_var("DASH_CACHE_TEST_GARBAGE", "forty-two");

        assert_eq!(env_or("DASH_CACHE_TEST_NUMBER", 7usize), 42);
        assert_eq!(env_or("DASH_CACHE_TEST_GARBAGE", 7usize), 7);
        assert_eq!(env_or("DASH_CACHE_TEST_MISSING", 7usize), 7);

        env::remove_var("DASH_CACHE_TEST_NUMBER");
        env::remove_var("DASH_CACHE_TEST_GARBAGE");
    }

    #[test]
    fn test_zero_ttl_falls_back_to_default() {
        env::set_var("CACHE_TTL", "0");
        let config = Config::from_env();
        env::remove_var("CACHE_TTL");

        assert_eq!(config.default_ttl, 3600);
    }
}
