// Miss coalescing
//
// Concurrent misses on one cache key share a single upstream fetch.
// The first lookup gets a `LeaderGuard` and fetches; the rest wait until
// that guard is dropped and then re-read the cache.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

type InFlight = Arc<Mutex<HashMap<String, watch::Sender<()>>>>;

/// Keys with a fetch in progress
///
/// Each in-flight key owns a watch sender that is never written to.
/// Waiters subscribe and are released when the leader drops it.
#[derive(Debug, Clone, Default)]
pub struct RequestCoalescer {
    in_flight: InFlight,
}

impl RequestCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the fetch for `key`
    ///
    /// Returns `Some(guard)` when no fetch is in flight; the caller fetches,
    /// stores the value, then drops the guard. Otherwise waits for the
    /// current leader to finish and returns `None`.
    pub async fn acquire(&self, key: &str) -> Option<LeaderGuard> {
        let mut done = {
            let mut in_flight = self.in_flight.lock();
            match in_flight.get(key) {
                Some(sender) => sender.subscribe(),
                None => {
                    let (sender, _) = watch::channel(());
                    in_flight.insert(key.to_string(), sender);
                    tracing::trace!(key = %key, "Coalescing leader acquired");
                    return Some(LeaderGuard {
                        key: key.to_string(),
                        in_flight: Arc::clone(&self.in_flight),
                    });
                }
            }
        };

        // Resolves with an error once the leader's sender is dropped
        let _ = done.changed().await;
        tracing::trace!(key = %key, "Coalescing leader finished");
        None
    }
}

/// Held by the lookup that fetches; dropping it releases every waiter
#[derive(Debug)]
pub struct LeaderGuard {
    key: String,
    in_flight: InFlight,
}

impl Drop for LeaderGuard {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.key);
    }
}
