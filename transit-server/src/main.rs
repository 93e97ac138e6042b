use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use transit_server::web::{AppState, create_router};
use transit_server::{CacheConfig, TflClient, TflConfig, TransitApi};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = TflConfig::new();
    if let Ok(base_url) = std::env::var("TFL_BASE_URL") {
        config = config.with_base_url(base_url);
    }
    let client = TflClient::new(config).expect("Failed to create TfL client");

    let api = TransitApi::new(std::sync::Arc::new(client), &CacheConfig::default());
    let state = AppState::new(api);
    let app = create_router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "transit server listening");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
