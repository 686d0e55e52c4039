use super::local::LocalBestMatch;
use super::types::{PlayerFrame, Verdict};
use super::windowed::WindowedDtw;
use crate::config::{ScoringParams, StrategyKind};
use crate::error::PmResult;
use crate::reference::ReferenceSequence;
use std::fmt::Debug;

/// An alignment strategy. Chosen once per session; owns whatever
/// cross-frame state it needs.
pub trait Aligner: Send + Debug {
    fn kind(&self) -> StrategyKind;

    /// Feeds one player frame. Frames arrive in order.
    fn observe(&mut self, frame: &PlayerFrame<'_>, reference: &ReferenceSequence) -> PmResult<Verdict>;

    /// Drops buffered state, e.g. when the reference changes.
    fn reset(&mut self);
}

pub fn build_aligner(params: &ScoringParams) -> Box<dyn Aligner> {
    match params.strategy {
        StrategyKind::WindowedDtw => Box::new(WindowedDtw::new(params.buffer_size, params.dtw_offset)),
        StrategyKind::LocalBestMatch => Box::new(LocalBestMatch::new(
            params.window_before,
            params.window_after,
            params.max_angle_diff,
        )),
    }
}
