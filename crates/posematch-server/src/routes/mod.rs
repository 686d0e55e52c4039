pub mod play;
pub mod system;

use crate::state::AppState;
use axum::Router;
use std::sync::Arc;

pub fn system_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", axum::routing::get(system::health))
}

/// Game clients connect to the bare address; `/ws` is the same endpoint.
pub fn play_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", axum::routing::get(play::upgrade))
        .route("/ws", axum::routing::get(play::upgrade))
}
