//! Route cache actor: per-line memoization of directional routes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{error, warn};

use crate::domain::Route;
use crate::fetch::TransitFetcher;

use super::CacheConfig;
use super::worker::{Lookup, run_keyed_worker};

/// Caching front for route lookups, keyed by line ID.
///
/// The underlying fetch resolves the line's stations first, so a
/// route miss implies one station call plus one sequence call.
pub struct RouteCache<F> {
    fetcher: Arc<F>,
    tx: mpsc::Sender<Lookup<Vec<Route>>>,
    handoff_timeout: Duration,
}

impl<F: TransitFetcher> RouteCache<F> {
    /// Spawn the owning worker and return the caller handle.
    pub fn new(fetcher: Arc<F>, config: &CacheConfig) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let worker_fetcher = Arc::clone(&fetcher);
        tokio::spawn(run_keyed_worker(rx, "routes", move |line_id: String| {
            let fetcher = Arc::clone(&worker_fetcher);
            async move { fetcher.fetch_routes(&line_id).await }
        }));
        Self {
            fetcher,
            tx,
            handoff_timeout: config.handoff_timeout,
        }
    }

    /// Directional routes for a line. Empty on failure.
    pub async fn for_line(&self, line_id: &str) -> Vec<Route> {
        let (reply, rx) = oneshot::channel();
        let request = Lookup {
            key: line_id.to_string(),
            reply,
        };
        match self.tx.send_timeout(request, self.handoff_timeout).await {
            Ok(()) => match timeout(self.handoff_timeout, rx).await {
                Ok(Ok(routes)) => return routes,
                Ok(Err(_)) | Err(_) => {
                    warn!(line_id, "timed out waiting for route cache reply, fetching one-off");
                }
            },
            Err(_) => {
                warn!(line_id, "route cache busy, fetching one-off");
            }
        }
        match self.fetcher.fetch_routes(line_id).await {
            Ok(routes) => routes,
            Err(e) => {
                error!(line_id, error = %e, "one-off route fetch failed");
                Vec::new()
            }
        }
    }
}
