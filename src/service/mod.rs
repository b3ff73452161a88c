//! Lookup service
//!
//! Orchestrates one lookup: validate, check the cache, and on a miss fetch
//! from upstream, normalize, store, and return. Errors from every stage are
//! propagated unchanged; this layer only adds the identifier or paging values
//! to the log context.

use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

use crate::cache::{Cache, CacheKey, CacheStats, MemoryCache, NullCache};
use crate::coalescing::RequestCoalescer;
use crate::config::Config;
use crate::constants::{ENTITY_NAMESPACE, PAGE_NAMESPACE};
use crate::error::LookupError;
use crate::normalize::{NormalizedEntity, NormalizedPage, Normalizer};
use crate::upstream::{PokeApiClient, UpstreamClient, UpstreamError};
use crate::validator;

/// Statistics for both cache namespaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCacheStats {
    pub pokemon: CacheStats,
    pub pokemon_list: CacheStats,
}

/// Read-through lookup over an upstream client and two cache namespaces
pub struct LookupService {
    upstream: Arc<dyn UpstreamClient>,
    normalizer: Normalizer,
    entity_cache: Arc<dyn Cache<NormalizedEntity>>,
    page_cache: Arc<dyn Cache<NormalizedPage>>,
    coalescer: Option<RequestCoalescer>,
}

impl LookupService {
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        normalizer: Normalizer,
        entity_cache: Arc<dyn Cache<NormalizedEntity>>,
        page_cache: Arc<dyn Cache<NormalizedPage>>,
    ) -> Self {
        Self {
            upstream,
            normalizer,
            entity_cache,
            page_cache,
            coalescer: None,
        }
    }

    /// Let concurrent misses on one key share a single upstream fetch
    pub fn with_coalescing(mut self) -> Self {
        self.coalescer = Some(RequestCoalescer::new());
        self
    }

    /// Wire the production service: reqwest upstream client and moka caches
    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        let upstream = Arc::new(PokeApiClient::from_config(&config.upstream)?);
        Ok(Self::with_upstream(config, upstream))
    }

    /// Same as [`LookupService::from_config`] with a caller-supplied upstream
    pub fn with_upstream(config: &Config, upstream: Arc<dyn UpstreamClient>) -> Self {
        let (entity_cache, page_cache): (
            Arc<dyn Cache<NormalizedEntity>>,
            Arc<dyn Cache<NormalizedPage>>,
        ) = if config.cache.enabled {
            (
                Arc::new(MemoryCache::new(ENTITY_NAMESPACE, &config.cache)),
                Arc::new(MemoryCache::new(PAGE_NAMESPACE, &config.cache)),
            )
        } else {
            tracing::info!("Caching disabled, every lookup goes upstream");
            (Arc::new(NullCache), Arc::new(NullCache))
        };

        let service = Self::new(
            upstream,
            Normalizer::from_config(&config.normalizer),
            entity_cache,
            page_cache,
        );

        if config.cache.enabled && config.cache.coalesce_misses {
            service.with_coalescing()
        } else {
            service
        }
    }

    /// Look up one entity by name or numeric id
    pub async fn get_entity(&self, raw_input: &str) -> Result<Arc<NormalizedEntity>, LookupError> {
        let identifier = validator::normalize(raw_input)?;
        let key = CacheKey::entity(&identifier);

        self.read_through(self.entity_cache.as_ref(), ENTITY_NAMESPACE, key, || {
            self.fetch_entity(&identifier)
        })
        .await
    }

    /// Look up one page of the listing
    pub async fn get_page(&self, offset: i64, limit: i64) -> Result<Arc<NormalizedPage>, LookupError> {
        validator::validate_page(offset, limit)?;
        let key = CacheKey::page(offset, limit);

        self.read_through(self.page_cache.as_ref(), PAGE_NAMESPACE, key, || {
            self.fetch_page(offset, limit)
        })
        .await
    }

    /// Per-namespace cache statistics
    pub async fn cache_stats(&self) -> ServiceCacheStats {
        ServiceCacheStats {
            pokemon: self.entity_cache.stats().await,
            pokemon_list: self.page_cache.stats().await,
        }
    }

    /// Empty both namespaces
    pub async fn clear_caches(&self) {
        self.entity_cache.clear().await;
        self.page_cache.clear().await;
        tracing::info!("Caches cleared");
    }

    /// Flush pending cache maintenance (evictions, expirations)
    pub async fn run_pending_cache_tasks(&self) {
        self.entity_cache.run_pending_tasks().await;
        self.page_cache.run_pending_tasks().await;
    }

    async fn read_through<V, F, Fut>(
        &self,
        cache: &dyn Cache<V>,
        namespace: &str,
        key: CacheKey,
        fetch: F,
    ) -> Result<Arc<V>, LookupError>
    where
        V: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, LookupError>>,
    {
        if let Some(hit) = cache.get(&key).await {
            tracing::debug!(cache = namespace, key = %key, "Cache hit");
            return Ok(hit);
        }
        tracing::debug!(cache = namespace, key = %key, "Cache miss");

        // Held until the value is stored so followers find it
        let _leader = match &self.coalescer {
            Some(coalescer) => match coalescer.acquire(&format!("{}:{}", namespace, key)).await {
                Some(guard) => Some(guard),
                None => {
                    if let Some(hit) = cache.get(&key).await {
                        tracing::debug!(cache = namespace, key = %key, "Coalesced cache hit");
                        return Ok(hit);
                    }
                    // Leader failed; fetch without coalescing
                    None
                }
            },
            None => None,
        };

        let value = Arc::new(fetch().await?);
        cache.put(key, Arc::clone(&value)).await;
        Ok(value)
    }

    async fn fetch_entity(&self, identifier: &str) -> Result<NormalizedEntity, LookupError> {
        let (entity, description) = tokio::try_join!(
            self.upstream.fetch_entity(identifier),
            self.upstream.fetch_description(identifier),
        )
        .map_err(|e| {
            tracing::warn!(identifier = %identifier, error = %e, "Upstream entity fetch failed");
            LookupError::from(e)
        })?;

        let normalized = self
            .normalizer
            .normalize_entity(&entity, &description)
            .map_err(|e| {
                tracing::warn!(identifier = %identifier, error = %e, "Entity normalization failed");
                e
            })?;

        tracing::info!(identifier = %identifier, id = normalized.id, "Fetched entity from upstream");
        Ok(normalized)
    }

    async fn fetch_page(&self, offset: i64, limit: i64) -> Result<NormalizedPage, LookupError> {
        let listing = self
            .upstream
            .fetch_listing(offset, limit)
            .await
            .map_err(|e| {
                tracing::warn!(offset, limit, error = %e, "Upstream listing fetch failed");
                LookupError::from(e)
            })?;

        let page = self
            .normalizer
            .normalize_page(&listing, offset, limit)
            .map_err(|e| {
                tracing::warn!(offset, limit, error = %e, "Listing normalization failed");
                e
            })?;

        tracing::info!(
            offset,
            limit,
            items = page.items.len(),
            "Fetched listing page from upstream"
        );
        Ok(page)
    }
}
