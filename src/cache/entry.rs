//! Cache key and entry types
//!
//! - `CacheKey`: lookup key inside one namespace
//! - `CacheEntry`: cached value plus the time it was written

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Key identifying a value inside one cache namespace
///
/// Entity and page lookups live in separate namespaces, so the two key
/// shapes never share a map.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a single-entity lookup: the validated identifier as-is
    ///
    /// `"25"` and `"pikachu"` stay distinct keys; no aliasing is done.
    pub fn entity(identifier: &str) -> Self {
        CacheKey(identifier.to_string())
    }

    /// Key for a listing page
    pub fn page(offset: i64, limit: i64) -> Self {
        CacheKey(format!("offset:{}-limit:{}", offset, limit))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cached value with its write timestamp
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// Shared, immutable value
    pub value: Arc<V>,
    /// When the entry was written
    pub stored_at: DateTime<Utc>,
}

// Manual impl: cloning only bumps the Arc, so V need not be Clone
impl<V> Clone for CacheEntry<V> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            stored_at: self.stored_at,
        }
    }
}

impl<V> CacheEntry<V> {
    pub fn new(value: Arc<V>, stored_at: DateTime<Utc>) -> Self {
        Self { value, stored_at }
    }

    /// Time elapsed since the write
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.stored_at
    }

    /// True once the entry is at least `ttl` old
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) >= ttl
    }
}
