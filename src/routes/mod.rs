// HTTP + WebSocket presentation adapter: read-only views plus the engine's configuration calls

mod http;
mod ws;

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::engine::Engine;
use crate::models::EngineView;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) engine: Engine,
    pub(crate) views_tx: broadcast::Sender<EngineView>,
    pub(crate) ws_state_connections: Arc<AtomicUsize>,
}

pub fn app(
    engine: Engine,
    views_tx: broadcast::Sender<EngineView>,
    ws_state_connections: Arc<AtomicUsize>,
) -> Router {
    let state = AppState {
        engine,
        views_tx,
        ws_state_connections,
    };
    Router::new()
        .route("/", get(|| async { "hostwatch: host metrics sampler" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/state", get(http::state_handler)) // GET /api/state
        .route("/api/alerts", get(http::alerts_handler)) // GET /api/alerts
        .route("/api/alerts/active", axum::routing::delete(http::clear_active_handler)) // DELETE /api/alerts/active
        .route("/api/pause", post(http::pause_handler)) // POST /api/pause
        .route("/api/resume", post(http::resume_handler)) // POST /api/resume
        .route("/api/interval", put(http::interval_handler)) // PUT /api/interval
        .route("/api/thresholds/{metric}", put(http::threshold_handler)) // PUT /api/thresholds/{metric}
        .route("/api/history-capacity", put(http::history_capacity_handler)) // PUT /api/history-capacity
        .route("/api/network-series", put(http::network_series_handler)) // PUT /api/network-series
        .route("/ws/state", get(ws::ws_state)) // WS /ws/state
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
