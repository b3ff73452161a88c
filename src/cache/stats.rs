//! Cache statistics types

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Per-namespace cache statistics for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses (including expired reads)
    pub misses: u64,
    /// Entries removed to stay within `max_entries`
    pub evictions: u64,
    /// Entries dropped because they outlived the TTL
    pub expirations: u64,
    /// Current number of entries
    pub entry_count: u64,
    /// Configured entry bound
    pub max_entries: u64,
}

impl CacheStats {
    /// Calculate hit rate (hits / total requests)
    /// Returns 0.0 if there are no requests
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// Hand-written so the derived hit rate is part of the output
impl Serialize for CacheStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CacheStats", 7)?;
        state.serialize_field("hits", &self.hits)?;
        state.serialize_field("misses", &self.misses)?;
        state.serialize_field("evictions", &self.evictions)?;
        state.serialize_field("expirations", &self.expirations)?;
        state.serialize_field("entry_count", &self.entry_count)?;
        state.serialize_field("max_entries", &self.max_entries)?;
        state.serialize_field("hit_rate", &self.hit_rate())?;
        state.end()
    }
}
