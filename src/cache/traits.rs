//! Cache trait definition
//!
//! One `Cache<V>` instance is one namespace. The lookup service holds two of
//! them (entities and pages) behind `Arc<dyn Cache<_>>`.

use async_trait::async_trait;
use std::sync::Arc;

use super::entry::CacheKey;
use super::stats::CacheStats;

/// Bounded, expiring key/value store shared across concurrent lookups
#[async_trait]
pub trait Cache<V>: Send + Sync
where
    V: Send + Sync + 'static,
{
    /// Get a value by key
    /// Returns None if the key is not found or the entry has expired
    async fn get(&self, key: &CacheKey) -> Option<Arc<V>>;

    /// Store a value, replacing any existing entry for the key
    async fn put(&self, key: CacheKey, value: Arc<V>);

    /// Remove every entry
    async fn clear(&self);

    /// Get cache statistics
    async fn stats(&self) -> CacheStats;

    /// Run pending async tasks (for caches that use async backends like moka)
    /// Default implementation is a no-op
    async fn run_pending_tasks(&self) {
        // No-op by default
    }
}
