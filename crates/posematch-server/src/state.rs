use posematch::pose::PoseDetector;
use posematch_protocol::config::ScoringParams;
use std::sync::Arc;

/// Shared, read-only server state. Sessions are created per connection
/// and never stored here.
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<dyn PoseDetector>,
    pub params: ScoringParams,
}

impl AppState {
    pub fn new(detector: Arc<dyn PoseDetector>, params: ScoringParams) -> Self {
        Self { detector, params }
    }
}
