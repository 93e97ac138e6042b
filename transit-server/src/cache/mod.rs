//! Single-writer cache actors for line, station and route lookups.
//!
//! Each resource kind is owned by exactly one spawned worker that
//! serially drains a request queue; the owning worker is the only
//! code that ever touches the map, so no lock exists anywhere in
//! this layer. Entries are process-lifetime memoized; a failed fetch
//! caches nothing, so the next request retries the remote call.
//!
//! Callers wait a bounded time to hand a request to the worker (and
//! the same budget again for the reply). Past that they fetch
//! uncached themselves and skip the write-back: bounded worst-case
//! latency traded for occasional duplicate remote calls under load.

pub mod lines;
pub mod routes;
pub mod stations;
mod worker;

use std::time::Duration;

pub use lines::LineCache;
pub use routes::RouteCache;
pub use stations::StationCache;

/// Default caller handoff/reply budget.
const DEFAULT_HANDOFF_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration shared by the cache actors.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a caller waits to hand a request to a busy worker
    /// (and again for the reply) before falling back to an uncached
    /// one-off fetch.
    pub handoff_timeout: Duration,
}

impl CacheConfig {
    pub fn with_handoff_timeout(mut self, timeout: Duration) -> Self {
        self.handoff_timeout = timeout;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            handoff_timeout: DEFAULT_HANDOFF_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.handoff_timeout, Duration::from_secs(5));
    }

    #[test]
    fn handoff_timeout_is_configurable() {
        let config = CacheConfig::default().with_handoff_timeout(Duration::from_millis(50));
        assert_eq!(config.handoff_timeout, Duration::from_millis(50));
    }
}
