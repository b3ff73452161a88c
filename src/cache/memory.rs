//! Memory cache implementation
//!
//! This module provides in-memory cache implementations:
//! - `MemoryCache`: bounded LRU cache backed by moka with write-based expiry
//! - `NullCache`: No-op implementation for disabled caching

use async_trait::async_trait;
use moka::notification::RemovalCause;
use moka::policy::EvictionPolicy;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::clock::{Clock, SystemClock};
use super::config::CacheConfig;
use super::entry::{CacheEntry, CacheKey};
use super::stats::CacheStats;
use super::traits::Cache;

/// Statistics tracker using atomics for thread safety
pub(crate) struct CacheStatsTracker {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl CacheStatsTracker {
    /// Create a new stats tracker with all counters at zero
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
        }
    }

    pub fn increment_hits(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_misses(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_evictions(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_expirations(&self) {
        self.expirations.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics
    pub fn snapshot(&self, entry_count: u64, max_entries: u64) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            entry_count,
            max_entries,
        }
    }
}

/// One cache namespace backed by moka
///
/// Capacity is enforced by moka with an LRU policy and unit weight per
/// entry. Expiry is checked on read against the injected clock: an entry
/// whose age reaches the TTL is invalidated and reported as a miss. moka's
/// own time-to-live is set to the same value so untouched entries are
/// reclaimed eventually.
pub struct MemoryCache<V> {
    name: String,
    cache: moka::future::Cache<CacheKey, CacheEntry<V>>,
    stats: Arc<CacheStatsTracker>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
    max_entries: u64,
}

impl<V> MemoryCache<V>
where
    V: Send + Sync + 'static,
{
    /// Create a new MemoryCache from configuration using wall-clock time
    pub fn new(name: &str, config: &CacheConfig) -> Self {
        Self::with_clock(name, config, Arc::new(SystemClock))
    }

    /// Create a new MemoryCache that ages entries with `clock`
    pub fn with_clock(name: &str, config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        // Create stats tracker first so we can share it with the eviction listener
        let stats = Arc::new(CacheStatsTracker::new());
        let stats_clone = stats.clone();

        let cache = moka::future::Cache::builder()
            .name(name)
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl())
            .eviction_policy(EvictionPolicy::lru())
            .eviction_listener(move |_key, _value, cause| match cause {
                RemovalCause::Size => stats_clone.increment_evictions(),
                RemovalCause::Expired => stats_clone.increment_expirations(),
                // Explicit invalidations and replacements are not evictions
                _ => {}
            })
            .build();

        let ttl = config.ttl();
        // Bounded by MAX_CACHE_TTL_SECONDS, well inside i64
        let ttl = chrono::Duration::seconds(ttl.as_secs() as i64);

        Self {
            name: name.to_string(),
            cache,
            stats,
            clock,
            ttl,
            max_entries: config.max_entries,
        }
    }

    /// Namespace name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get an entry from the cache
    /// Returns None if key not found or entry expired
    pub async fn get_entry(&self, key: &CacheKey) -> Option<Arc<V>> {
        match self.cache.get(key).await {
            Some(entry) if entry.is_expired(self.clock.now(), self.ttl) => {
                self.cache.invalidate(key).await;
                self.stats.increment_expirations();
                self.stats.increment_misses();
                tracing::debug!(cache = %self.name, key = %key, "Cache entry expired");
                None
            }
            Some(entry) => {
                self.stats.increment_hits();
                Some(entry.value)
            }
            None => {
                self.stats.increment_misses();
                None
            }
        }
    }

    /// Insert an entry stamped with the current clock time
    pub async fn set_entry(&self, key: CacheKey, value: Arc<V>) {
        let entry = CacheEntry::new(value, self.clock.now());
        self.cache.insert(key, entry).await;
        // moka applies max_capacity lazily; settle it before the put returns
        self.cache.run_pending_tasks().await;
    }

    /// Clear all entries from the cache
    pub async fn clear_all(&self) {
        self.cache.invalidate_all();
        // Note: This initiates invalidation but may not complete immediately
        // Call run_pending() to ensure completion
    }

    /// Run pending maintenance tasks
    /// Forces moka to process pending evictions, expirations, and invalidations
    pub async fn run_pending(&self) {
        self.cache.run_pending_tasks().await;
    }

    /// Get current entry count (approximate until pending tasks have run)
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Whether a key is present, without touching statistics or recency
    pub fn contains_key(&self, key: &CacheKey) -> bool {
        self.cache.contains_key(key)
    }

    fn get_stats(&self) -> CacheStats {
        self.stats.snapshot(self.cache.entry_count(), self.max_entries)
    }
}

#[async_trait]
impl<V> Cache<V> for MemoryCache<V>
where
    V: Send + Sync + 'static,
{
    async fn get(&self, key: &CacheKey) -> Option<Arc<V>> {
        self.get_entry(key).await
    }

    async fn put(&self, key: CacheKey, value: Arc<V>) {
        self.set_entry(key, value).await
    }

    async fn clear(&self) {
        self.clear_all().await;
        self.cache.run_pending_tasks().await;
    }

    async fn stats(&self) -> CacheStats {
        self.get_stats()
    }

    async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

/// NullCache is a no-op cache implementation used when caching is disabled
pub struct NullCache;

#[async_trait]
impl<V> Cache<V> for NullCache
where
    V: Send + Sync + 'static,
{
    async fn get(&self, _key: &CacheKey) -> Option<Arc<V>> {
        None
    }

    async fn put(&self, _key: CacheKey, _value: Arc<V>) {}

    async fn clear(&self) {}

    async fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}
