use brs_cache::{CacheConfig, RedisCache};
use brs_config::{CorsConfig, InternalApiConfig, JwtConfig, MediaConfig};
use brs_db::init_db_pool;
use sqlx::PgPool;
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub media_config: MediaConfig,
    pub internal_api_config: InternalApiConfig,
    pub cache_config: CacheConfig,
    /// `None` when caching is disabled or Redis was unreachable at startup
    pub cache: Option<RedisCache>,
}

impl AppState {
    pub fn cache(&self) -> Option<&RedisCache> {
        self.cache.as_ref()
    }
}

pub async fn init_app_state() -> AppState {
    let cache_config = CacheConfig::from_env();
    let cache = connect_cache(&cache_config).await;

    let jwt_config = JwtConfig::from_env();
    if jwt_config.uses_dev_secret() {
        warn!("JWT_SECRET is not set, signing tokens with the development secret");
    }

    AppState {
        db: init_db_pool().await,
        jwt_config,
        cors_config: CorsConfig::from_env(),
        media_config: MediaConfig::from_env(),
        internal_api_config: InternalApiConfig::from_env(),
        cache_config,
        cache,
    }
}

async fn connect_cache(config: &CacheConfig) -> Option<RedisCache> {
    if !config.enabled {
        info!("Cache disabled, Telegram linking is unavailable");
        return None;
    }

    match RedisCache::new(&config.redis_url).await {
        Ok(cache) => {
            info!("Connected to Redis");
            Some(cache)
        }
        Err(e) => {
            warn!(error = %e, "Redis unavailable, continuing without cache");
            None
        }
    }
}
