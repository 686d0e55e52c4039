use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use posematch_protocol::protocol::HealthResponse;
use std::sync::Arc;

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        strategy: state.params.strategy.to_string(),
    })
}
