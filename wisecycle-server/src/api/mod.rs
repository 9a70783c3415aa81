//! HTTP API.

mod routes;


use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::Semaphore;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::state::AppState;

pub use routes::router;

/// The API router with the server-wide middleware stack.
///
/// `permits` is shared by every route, so at most that many requests are
/// handled at once across the whole API.
pub fn app(state: Arc<AppState>, server: &ServerConfig, permits: Arc<Semaphore>) -> Router {
    router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_secs,
        )))
        .layer(GlobalConcurrencyLimitLayer::with_semaphore(permits))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
