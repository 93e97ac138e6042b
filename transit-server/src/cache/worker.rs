//! Shared worker loop for the keyed cache actors.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::{mpsc, oneshot};
use tracing::error;

use crate::tfl::TflError;

/// One queued lookup: a key plus a dedicated single-slot reply
/// channel. The worker's send into the slot never blocks, so a
/// caller that abandoned its request does not wedge the queue.
pub(crate) struct Lookup<V> {
    pub key: String,
    pub reply: oneshot::Sender<V>,
}

/// Drain lookups for one resource kind, memoizing per key.
///
/// Misses fetch synchronously inside the loop, so at most one remote
/// call per resource kind is in flight and requests are served in
/// strict arrival order. A failed fetch is logged and answered with
/// an empty value; nothing is cached for it.
pub(crate) async fn run_keyed_worker<V, Fetch, Fut>(
    mut rx: mpsc::Receiver<Lookup<Vec<V>>>,
    resource: &'static str,
    fetch: Fetch,
) where
    V: Clone + Send + 'static,
    Fetch: Fn(String) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Vec<V>, TflError>> + Send,
{
    let mut cache: HashMap<String, Vec<V>> = HashMap::new();
    while let Some(request) = rx.recv().await {
        if let Some(cached) = cache.get(&request.key) {
            let _ = request.reply.send(cached.clone());
            continue;
        }
        match fetch(request.key.clone()).await {
            Ok(value) => {
                cache.insert(request.key.clone(), value.clone());
                let _ = request.reply.send(value);
            }
            Err(e) => {
                error!(resource, key = %request.key, error = %e, "fetch failed, nothing cached");
                let _ = request.reply.send(Vec::new());
            }
        }
    }
}
