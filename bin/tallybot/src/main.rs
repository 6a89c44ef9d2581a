//! TallyBot entry point.
//!
//! Wires the Binance market data feed, the session store and the HTTP
//! server together from environment configuration.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use api::AppState;
use common::{Config, Result};
use feed::BinanceFeed;
use session::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let config = Config::from_env();
    info!(port = config.port, "TallyBot starting");

    // ── Shared collaborators ──────────────────────────────────────────────────
    let feed = Arc::new(BinanceFeed::new(
        config.binance_rest_url.clone(),
        config.binance_ws_url.clone(),
    ));
    let store = SessionStore::new();

    // ── API server ────────────────────────────────────────────────────────────
    let state = AppState { feed, store };
    let server = tokio::spawn(api::serve(state, config.port));

    tokio::select! {
        result = server => match result {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Server task failed");
                Ok(())
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            Ok(())
        }
    }
}
