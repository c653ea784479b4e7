/// Application context and dependency injection
use std::sync::Arc;

use tracing::info;

use crate::cache::{CacheStore, MemoryCache, RedisCache};
use crate::config::GlueConfig;
use crate::error::GlueResult;
use crate::fetch::Fetcher;

/// Shared services, passed down into every handler as axum state. There is
/// no process-wide singleton: the single cache instance lives here.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<GlueConfig>,
    pub cache: Arc<dyn CacheStore>,
    pub fetcher: Fetcher,
}

impl AppContext {
    /// Create a new application context from configuration. The cache
    /// backend is selected once, here: Redis when configured, otherwise
    /// the in-process map.
    pub async fn new(config: GlueConfig) -> GlueResult<Self> {
        let cache: Arc<dyn CacheStore> = match &config.cache.redis_url {
            Some(url) => {
                info!("using redis cache");
                Arc::new(RedisCache::connect(url).await?)
            }
            None => {
                info!("using memory cache");
                Arc::new(MemoryCache::new())
            }
        };

        Self::with_store(config, cache)
    }

    /// Build a context around an explicit cache store
    pub fn with_store(config: GlueConfig, cache: Arc<dyn CacheStore>) -> GlueResult<Self> {
        let fetcher = Fetcher::new(&config.fetch)?;

        Ok(Self {
            config: Arc::new(config),
            cache,
            fetcher,
        })
    }
}
