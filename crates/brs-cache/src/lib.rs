//! # BRS Cache
//!
//! Redis-backed storage for short-lived data of the BRS identity service.
//!
//! This crate provides:
//! - Redis connection management
//! - Cache operations (get, set with TTL, delete, exists)
//! - Cache configuration from environment variables
//! - The one-time code store behind Telegram account linking
//!
//! # Example
//!
//! ```ignore
//! use brs_cache::{CacheConfig, RedisCache, link_codes};
//!
//! let config = CacheConfig::from_env();
//! let cache = RedisCache::new(&config.redis_url).await?;
//!
//! let code = link_codes::issue(&cache, &config, 123456789).await?;
//! let telegram_id = link_codes::resolve(&cache, &config, &code).await;
//! ```

pub mod config;
pub mod link_codes;
pub mod redis;

pub use config::CacheConfig;
pub use redis::{CacheError, RedisCache};
