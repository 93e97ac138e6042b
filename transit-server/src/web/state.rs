//! Application state for the web layer.

use std::sync::Arc;

use crate::api::TransitApi;
use crate::tfl::TflClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Query facade over the cache actors and live fetches.
    pub api: Arc<TransitApi<TflClient>>,
}

impl AppState {
    pub fn new(api: TransitApi<TflClient>) -> Self {
        Self { api: Arc::new(api) }
    }
}
