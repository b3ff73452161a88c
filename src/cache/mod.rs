// Cache module
//
// Two independent namespaces (entities and pages) each get their own
// `MemoryCache`. Both share one `CacheConfig`.

mod clock;
mod config;
mod entry;
mod memory;
mod stats;
mod traits;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use entry::{CacheEntry, CacheKey};
pub use memory::{MemoryCache, NullCache};
pub use stats::CacheStats;
pub use traits::Cache;
