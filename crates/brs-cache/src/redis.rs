//! Thin async Redis client for short-lived keys.
//!
//! Values are stored as plain Redis strings; numbers and text round-trip
//! through the `redis` crate's own conversions.

use redis::{
    AsyncCommands, Client, ExistenceCheck, FromRedisValue, SetExpiry, SetOptions, ToRedisArgs,
    aio::ConnectionManager,
};
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Could not allocate a unique key")]
    Exhausted,
}

/// Shared handle; clones reuse the same reconnecting connection.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache").finish_non_exhaustive()
    }
}

fn expiry(ttl: Duration) -> SetExpiry {
    // EX 0 is rejected by Redis
    SetExpiry::EX(ttl.as_secs().max(1) as _)
}

impl RedisCache {
    pub async fn new(redis_url: &str) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    /// Reads a key. Missing keys and values of another type both read as
    /// `None`.
    #[instrument(skip(self), fields(cache.operation = "GET"))]
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: FromRedisValue,
    {
        let mut conn = self.conn.clone();
        let raw: Option<redis::Value> = conn.get(key).await?;

        let Some(raw) = raw else {
            debug!(cache.key = %key, "Cache miss");
            return Ok(None);
        };

        match T::from_redis_value(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(cache.key = %key, error = %e, "Unexpected value type in cache");
                Ok(None)
            }
        }
    }

    /// Writes a key that expires after `ttl`.
    #[instrument(skip(self, value), fields(cache.operation = "SET"))]
    pub async fn put<V>(&self, key: &str, value: V, ttl: Duration) -> Result<(), CacheError>
    where
        V: ToRedisArgs + Send + Sync,
    {
        let mut conn = self.conn.clone();
        let options = SetOptions::default().with_expiration(expiry(ttl));
        conn.set_options::<_, _, ()>(key, value, options).await?;
        Ok(())
    }

    /// Writes a key only if it does not exist yet; returns whether the write
    /// happened.
    #[instrument(skip(self, value), fields(cache.operation = "SET NX"))]
    pub async fn put_if_absent<V>(
        &self,
        key: &str,
        value: V,
        ttl: Duration,
    ) -> Result<bool, CacheError>
    where
        V: ToRedisArgs + Send + Sync,
    {
        let mut conn = self.conn.clone();
        let options = SetOptions::default()
            .conditional_set(ExistenceCheck::NX)
            .with_expiration(expiry(ttl));
        let reply: Option<String> = conn.set_options(key, value, options).await?;
        Ok(reply.is_some())
    }

    /// Deletes every given key in one round trip.
    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    pub async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        let removed: usize = conn.del(keys).await?;
        debug!(removed, "Cache keys deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(cache.operation = "EXISTS"))]
    pub async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn.clone();
        Ok(conn.exists(key).await?)
    }
}
