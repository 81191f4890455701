//! Redis cache configuration.

use std::env;
use std::time::Duration;

/// Redis cache configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `CACHE_ENABLED`: set to `false` to run without Redis (default: `true`)
/// - `REDIS_URL`: Redis connection URL (default: `redis://127.0.0.1:6379`)
/// - `TELEGRAM_CODE_TTL_SECONDS`: lifetime of Telegram link codes (default: `300`)
/// - `CACHE_PREFIX`: Prefix for all cache keys (default: `brs`)
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub enabled: bool,

    /// Redis connection URL.
    pub redis_url: String,

    /// How long an issued Telegram link code stays valid.
    pub link_code_ttl_seconds: u64,

    /// Prefix for all cache keys to avoid collisions.
    pub key_prefix: String,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env::var("CACHE_ENABLED")
                .map(|v| !matches!(v.trim(), "false" | "0" | "no"))
                .unwrap_or(defaults.enabled),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            link_code_ttl_seconds: env::var("TELEGRAM_CODE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.link_code_ttl_seconds),
            key_prefix: env::var("CACHE_PREFIX").unwrap_or(defaults.key_prefix),
        }
    }

    pub fn link_code_ttl(&self) -> Duration {
        Duration::from_secs(self.link_code_ttl_seconds)
    }

    /// Build a prefixed cache key.
    ///
    /// ```ignore
    /// let key = config.prefixed_key("telegram:code:123456");
    /// // Returns "brs:telegram:code:123456"
    /// ```
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redis_url: "redis://127.0.0.1:6379".into(),
            link_code_ttl_seconds: 300,
            key_prefix: "brs".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_key() {
        let config = CacheConfig::default();
        assert_eq!(config.prefixed_key("telegram:code:1"), "brs:telegram:code:1");
    }

    #[test]
    fn test_link_code_ttl() {
        let config = CacheConfig {
            link_code_ttl_seconds: 90,
            ..Default::default()
        };
        assert_eq!(config.link_code_ttl(), Duration::from_secs(90));
    }
}
