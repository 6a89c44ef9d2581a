//! HTTP and WebSocket surface.
//!
//! A single axum server exposes the REST endpoints (historical klines,
//! backtesting, health) and the `/ws` upgrade that drives live trading
//! sessions.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use common::{MarketData, Result};
use session::SessionStore;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub mod routes;

/// Shared application state injected into every route handler.
#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<dyn MarketData>,
    pub store: SessionStore,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any);

    Router::new()
        .merge(routes::api_router())
        .merge(routes::ws_router())
        .merge(routes::health_router())
        .with_state(state)
        .layer(cors)
}

/// Build and run the Axum API server.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(state);

    info!(%addr, "API listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
