//! One-time codes for linking a Telegram account to a user.
//!
//! Issuing a code stores two entries with the same TTL: `code -> telegram_id`
//! and `telegram_id -> code`. Both are removed once the code is consumed.

use crate::{CacheConfig, CacheError, RedisCache};
use rand::Rng as _;
use tracing::{info, instrument, warn};

pub const CODE_LENGTH: usize = 6;

const MAX_ATTEMPTS: usize = 5;

pub fn code_key(config: &CacheConfig, code: &str) -> String {
    config.prefixed_key(&format!("telegram:code:{}", code))
}

pub fn telegram_key(config: &CacheConfig, telegram_id: i64) -> String {
    config.prefixed_key(&format!("telegram:id:{}", telegram_id))
}

/// A random numeric code, zero-padded to [`CODE_LENGTH`] digits.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Issues a fresh code for `telegram_id`, replacing any code issued before.
#[instrument(skip(cache, config))]
pub async fn issue(
    cache: &RedisCache,
    config: &CacheConfig,
    telegram_id: i64,
) -> Result<String, CacheError> {
    let ttl = config.link_code_ttl();
    let id_key = telegram_key(config, telegram_id);

    if let Some(previous) = cache.get::<String>(&id_key).await? {
        cache.delete(&[code_key(config, &previous)]).await?;
    }

    for _ in 0..MAX_ATTEMPTS {
        let code = generate_code();
        if cache
            .put_if_absent(&code_key(config, &code), telegram_id, ttl)
            .await?
        {
            cache.put(&id_key, &code, ttl).await?;
            info!(telegram_id, "Telegram link code issued");
            return Ok(code);
        }
    }

    warn!(telegram_id, "No free Telegram link code");
    Err(CacheError::Exhausted)
}

/// The Telegram id a code was issued for, if the code is still valid.
#[instrument(skip(cache, config, code))]
pub async fn resolve(cache: &RedisCache, config: &CacheConfig, code: &str) -> Option<i64> {
    if code.is_empty() {
        return None;
    }
    match cache.get::<i64>(&code_key(config, code)).await {
        Ok(telegram_id) => telegram_id,
        Err(e) => {
            warn!(error = %e, "Telegram link code lookup failed");
            None
        }
    }
}

/// Deletes both entries of a used code.
#[instrument(skip(cache, config, code))]
pub async fn consume(
    cache: &RedisCache,
    config: &CacheConfig,
    code: &str,
    telegram_id: i64,
) -> Result<(), CacheError> {
    cache
        .delete(&[code_key(config, code), telegram_key(config, telegram_id)])
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_is_numeric() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_keys_are_prefixed_and_distinct() {
        let config = CacheConfig::default();
        assert_eq!(code_key(&config, "123456"), "brs:telegram:code:123456");
        assert_eq!(telegram_key(&config, 42), "brs:telegram:id:42");
        assert_ne!(code_key(&config, "42"), telegram_key(&config, 42));
    }

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_issue_resolve_consume() {
        let config = CacheConfig::default();
        let cache = RedisCache::new(&config.redis_url).await.unwrap();

        let code = issue(&cache, &config, 777).await.unwrap();
        assert_eq!(resolve(&cache, &config, &code).await, Some(777));

        consume(&cache, &config, &code, 777).await.unwrap();
        assert_eq!(resolve(&cache, &config, &code).await, None);
        assert!(!cache.exists(&telegram_key(&config, 777)).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_reissue_revokes_previous_code() {
        let config = CacheConfig::default();
        let cache = RedisCache::new(&config.redis_url).await.unwrap();

        let first = issue(&cache, &config, 778).await.unwrap();
        let second = issue(&cache, &config, 778).await.unwrap();

        if first != second {
            assert_eq!(resolve(&cache, &config, &first).await, None);
        }
        assert_eq!(resolve(&cache, &config, &second).await, Some(778));

        consume(&cache, &config, &second, 778).await.unwrap();
    }
}
