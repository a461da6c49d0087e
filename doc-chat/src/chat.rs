//! Process-wide chat engine shared by every session.

use crate::catalog::ServiceCatalog;
use crate::cfg::ChatConfig;
use crate::error::ChatResult;
use crate::llm::CompletionCache;
use crate::platform::DocPlatform;

/// Platform handle, configuration, discovered services and completion cache.
///
/// Holds no per-session data: session state is passed into each call and a
/// new state is returned, so one engine serves many sessions concurrently.
pub struct DocChat<P> {
    platform: P,
    cfg: ChatConfig,
    catalog: ServiceCatalog,
    cache: CompletionCache,
}

impl<P: DocPlatform> DocChat<P> {
    pub fn new(platform: P, cfg: ChatConfig, catalog: ServiceCatalog) -> Self {
        Self {
            platform,
            cfg,
            catalog,
            cache: CompletionCache::default(),
        }
    }

    /// Builds the engine after listing search services once.
    ///
    /// # Errors
    /// Propagates the platform error from service discovery.
    pub async fn discover(platform: P, cfg: ChatConfig) -> ChatResult<Self> {
        let catalog = ServiceCatalog::discover(&platform, &cfg.default_search_service).await?;
        Ok(Self::new(platform, cfg, catalog))
    }

    pub fn with_cache(mut self, cache: CompletionCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn config(&self) -> &ChatConfig {
        &self.cfg
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    pub(crate) fn cache(&self) -> &CompletionCache {
        &self.cache
    }
}
