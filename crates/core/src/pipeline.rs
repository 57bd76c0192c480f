//! The single egress path to the Riot API: cache, then rate limiter, then
//! upstream.

use crate::cache::ResponseCache;
use crate::config::LolbyteConfig;
use crate::error::LolResult;
use crate::rate_limit::RateLimiter;
use crate::upstream::{HttpUpstream, Upstream};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Cached, rate-limited fetcher shared by every operation.
#[derive(Clone)]
pub struct FetchPipeline {
    cache: Arc<ResponseCache>,
    limiter: Arc<RateLimiter>,
    upstream: Arc<dyn Upstream>,
}

impl FetchPipeline {
    pub fn new(
        cache: Arc<ResponseCache>,
        limiter: Arc<RateLimiter>,
        upstream: Arc<dyn Upstream>,
    ) -> Self {
        Self {
            cache,
            limiter,
            upstream,
        }
    }

    /// Build the production pipeline from configuration.
    pub fn from_config(config: &LolbyteConfig) -> LolResult<Self> {
        let upstream = HttpUpstream::new(config)?;
        Ok(Self::new(
            Arc::new(ResponseCache::new(config.cache_ttl())),
            Arc::new(RateLimiter::new(config.min_spacing())),
            Arc::new(upstream),
        ))
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Fetch `url`, serving from cache when possible. Failures are never
    /// cached.
    pub async fn fetch(&self, url: &str) -> LolResult<Value> {
        if let Some(cached) = self.cache.get(url) {
            debug!(url = %url, "Cache hit");
            return Ok(cached);
        }

        debug!(url = %url, "Cache miss");
        let payload = self.limiter.schedule(|| self.upstream.get(url)).await?;

        self.cache.set(url, payload.clone());
        Ok(payload)
    }
}
