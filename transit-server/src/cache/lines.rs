//! Line cache actor.
//!
//! Keyed by transit mode, with a secondary by-ID index so a details
//! lookup can answer from any previously listed mode. A specific
//! line ID absent from the cached set answers with the placeholder
//! `{ID, Name=ID}` rather than failing, which keeps links to unknown
//! or newly introduced lines working.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{error, warn};

use crate::domain::Line;
use crate::fetch::TransitFetcher;

use super::CacheConfig;

struct LineLookup {
    mode: String,
    /// When set, answer with exactly this line (or its placeholder)
    /// instead of the whole listing.
    line_id: Option<String>,
    reply: oneshot::Sender<Vec<Line>>,
}

/// Caching front for line lookups.
pub struct LineCache<F> {
    fetcher: Arc<F>,
    tx: mpsc::Sender<LineLookup>,
    handoff_timeout: Duration,
}

impl<F: TransitFetcher> LineCache<F> {
    /// Spawn the owning worker and return the caller handle.
    pub fn new(fetcher: Arc<F>, config: &CacheConfig) -> Self {
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(run_worker(Arc::clone(&fetcher), rx));
        Self {
            fetcher,
            tx,
            handoff_timeout: config.handoff_timeout,
        }
    }

    /// All lines for a mode, sorted by ID. Empty on failure.
    pub async fn list(&self, mode: &str) -> Vec<Line> {
        self.lookup(mode, None).await
    }

    /// One line by ID, or the placeholder when the cached set for
    /// the mode does not contain it. `None` only when the lookup
    /// itself failed.
    pub async fn details(&self, mode: &str, line_id: &str) -> Option<Line> {
        let mut lines = self.lookup(mode, Some(line_id.to_string())).await;
        if lines.len() == 1 { lines.pop() } else { None }
    }

    async fn lookup(&self, mode: &str, line_id: Option<String>) -> Vec<Line> {
        let (reply, rx) = oneshot::channel();
        let request = LineLookup {
            mode: mode.to_string(),
            line_id: line_id.clone(),
            reply,
        };
        match self.tx.send_timeout(request, self.handoff_timeout).await {
            Ok(()) => match timeout(self.handoff_timeout, rx).await {
                Ok(Ok(lines)) => return lines,
                Ok(Err(_)) | Err(_) => {
                    warn!(mode, "timed out waiting for line cache reply, fetching one-off");
                }
            },
            Err(_) => {
                warn!(mode, "line cache busy, fetching one-off");
            }
        }
        match self.fetcher.fetch_lines(mode).await {
            Ok(lines) => match line_id {
                None => lines,
                Some(id) => vec![
                    lines
                        .iter()
                        .find(|l| l.id == id)
                        .cloned()
                        .unwrap_or_else(|| Line::placeholder(&id)),
                ],
            },
            Err(e) => {
                error!(mode, error = %e, "one-off line fetch failed");
                Vec::new()
            }
        }
    }
}

async fn run_worker<F: TransitFetcher>(fetcher: Arc<F>, mut rx: mpsc::Receiver<LineLookup>) {
    let mut by_mode: HashMap<String, Vec<Line>> = HashMap::new();
    let mut by_id: HashMap<String, Line> = HashMap::new();

    while let Some(request) = rx.recv().await {
        if let Some(lines) = by_mode.get(&request.mode) {
            respond(request, lines, &by_id);
            continue;
        }
        match fetcher.fetch_lines(&request.mode).await {
            Ok(lines) => {
                for line in &lines {
                    by_id.insert(line.id.clone(), line.clone());
                }
                by_mode.insert(request.mode.clone(), lines.clone());
                respond(request, &lines, &by_id);
            }
            Err(e) => {
                error!(mode = %request.mode, error = %e, "line fetch failed, nothing cached");
                let _ = request.reply.send(Vec::new());
            }
        }
    }
}

fn respond(request: LineLookup, lines: &[Line], by_id: &HashMap<String, Line>) {
    let payload = match &request.line_id {
        None => lines.to_vec(),
        Some(id) => vec![
            by_id
                .get(id)
                .cloned()
                .unwrap_or_else(|| Line::placeholder(id)),
        ],
    };
    let _ = request.reply.send(payload);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tfl::mock::MockFetcher;
    use std::sync::atomic::Ordering;

    fn line(id: &str, name: &str) -> Line {
        Line {
            id: id.into(),
            name: name.into(),
            ..Line::default()
        }
    }

    fn tube_fetcher() -> MockFetcher {
        MockFetcher::new().with_lines(
            "tube",
            vec![line("northern", "Northern"), line("victoria", "Victoria")],
        )
    }

    #[tokio::test]
    async fn listing_is_memoized_per_mode() {
        let fetcher = Arc::new(tube_fetcher());
        let cache = LineCache::new(Arc::clone(&fetcher), &CacheConfig::default());

        assert_eq!(cache.list("tube").await.len(), 2);
        assert_eq!(cache.list("tube").await.len(), 2);
        assert_eq!(fetcher.calls.lines.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn details_answer_from_cache_without_refetch() {
        let fetcher = Arc::new(tube_fetcher());
        let cache = LineCache::new(Arc::clone(&fetcher), &CacheConfig::default());

        cache.list("tube").await;
        let victoria = cache.details("tube", "victoria").await.unwrap();
        assert_eq!(victoria.name, "Victoria");
        assert_eq!(fetcher.calls.lines.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_line_id_gets_a_placeholder() {
        let fetcher = Arc::new(tube_fetcher());
        let cache = LineCache::new(Arc::clone(&fetcher), &CacheConfig::default());

        cache.list("tube").await;
        let unknown = cache.details("tube", "unknown-id").await.unwrap();
        assert_eq!(unknown.id, "unknown-id");
        assert_eq!(unknown.name, "unknown-id");
    }

    #[tokio::test]
    async fn failed_fetch_is_not_negatively_cached() {
        let fetcher = Arc::new(tube_fetcher().fail_next(1));
        let cache = LineCache::new(Arc::clone(&fetcher), &CacheConfig::default());

        assert!(cache.list("tube").await.is_empty());
        assert_eq!(cache.list("tube").await.len(), 2);
        assert_eq!(fetcher.calls.lines.load(Ordering::SeqCst), 2);
    }
}
