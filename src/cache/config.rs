//! Cache configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL_SECONDS, MAX_CACHE_TTL_SECONDS,
};

fn default_enabled() -> bool {
    true
}

fn default_ttl_seconds() -> u64 {
    DEFAULT_CACHE_TTL_SECONDS
}

fn default_max_entries() -> u64 {
    DEFAULT_CACHE_MAX_ENTRIES
}

/// Settings shared by both cache namespaces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// When false every lookup goes upstream
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Entry lifetime measured from write (default: 1800)
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// Live entry bound per namespace (default: 200)
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    /// Let concurrent misses on one key share a single upstream fetch
    #[serde(default)]
    pub coalesce_misses: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            ttl_seconds: default_ttl_seconds(),
            max_entries: default_max_entries(),
            coalesce_misses: false,
        }
    }
}

impl CacheConfig {
    /// Entry lifetime as a std duration, capped at `MAX_CACHE_TTL_SECONDS`
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds.min(MAX_CACHE_TTL_SECONDS))
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.ttl_seconds == 0 {
            return Err("cache.ttl_seconds must be greater than 0".to_string());
        }
        if self.ttl_seconds > MAX_CACHE_TTL_SECONDS {
            return Err(format!(
                "cache.ttl_seconds must be at most {} (one year)",
                MAX_CACHE_TTL_SECONDS
            ));
        }
        if self.max_entries == 0 {
            return Err("cache.max_entries must be greater than 0".to_string());
        }
        Ok(())
    }
}
