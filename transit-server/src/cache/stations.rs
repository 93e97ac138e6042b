//! Station cache actor: per-line memoization of stop points.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{error, warn};

use crate::domain::Station;
use crate::fetch::TransitFetcher;

use super::CacheConfig;
use super::worker::{Lookup, run_keyed_worker};

/// Caching front for station lookups, keyed by line ID.
pub struct StationCache<F> {
    fetcher: Arc<F>,
    tx: mpsc::Sender<Lookup<Vec<Station>>>,
    handoff_timeout: Duration,
}

impl<F: TransitFetcher> StationCache<F> {
    /// Spawn the owning worker and return the caller handle.
    pub fn new(fetcher: Arc<F>, config: &CacheConfig) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let worker_fetcher = Arc::clone(&fetcher);
        tokio::spawn(run_keyed_worker(rx, "stations", move |line_id: String| {
            let fetcher = Arc::clone(&worker_fetcher);
            async move { fetcher.fetch_stations(&line_id).await }
        }));
        Self {
            fetcher,
            tx,
            handoff_timeout: config.handoff_timeout,
        }
    }

    /// Stations served by a line. Empty on failure.
    pub async fn for_line(&self, line_id: &str) -> Vec<Station> {
        let (reply, rx) = oneshot::channel();
        let request = Lookup {
            key: line_id.to_string(),
            reply,
        };
        match self.tx.send_timeout(request, self.handoff_timeout).await {
            Ok(()) => match timeout(self.handoff_timeout, rx).await {
                Ok(Ok(stations)) => return stations,
                Ok(Err(_)) | Err(_) => {
                    warn!(line_id, "timed out waiting for station cache reply, fetching one-off");
                }
            },
            Err(_) => {
                warn!(line_id, "station cache busy, fetching one-off");
            }
        }
        match self.fetcher.fetch_stations(line_id).await {
            Ok(stations) => stations,
            Err(e) => {
                error!(line_id, error = %e, "one-off station fetch failed");
                Vec::new()
            }
        }
    }
}
