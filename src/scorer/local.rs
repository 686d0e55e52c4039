//! Per-frame best match against a short window of the reference.

use super::engine::Aligner;
use super::types::{MatchScore, PlayerFrame, Verdict};
use crate::config::StrategyKind;
use crate::error::PmResult;
use crate::reference::ReferenceSequence;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LocalBestMatch {
    before: usize,
    after: usize,
    max_diff: f32,
}

impl LocalBestMatch {
    pub fn new(before: usize, after: usize, max_diff: f32) -> Self {
        Self {
            before,
            after,
            max_diff,
        }
    }

    /// `[frame - before, frame + after)` clamped to `[0, len - 1)`.
    pub fn window_bounds(&self, frame_number: usize, reference_len: usize) -> (usize, usize) {
        let start = frame_number.saturating_sub(self.before);
        let end = frame_number
            .saturating_add(self.after)
            .min(reference_len.saturating_sub(1));
        (start, end)
    }

    /// `max(0, 1 - mean(min(|a - b|, max_diff)))`.
    pub fn correctness(&self, player: &[f32], reference: &[f32]) -> f32 {
        let n = player.len().min(reference.len());
        if n == 0 {
            return 0.0;
        }
        let sum: f32 = player
            .iter()
            .zip(reference)
            .map(|(a, b)| (a - b).abs().min(self.max_diff))
            .sum();
        (1.0 - sum / n as f32).max(0.0)
    }

    /// Best candidate in the window; the first one wins ties.
    pub fn best_match(&self, features: &[f32], frame_number: usize, reference: &ReferenceSequence) -> Option<MatchScore> {
        let (start, end) = self.window_bounds(frame_number, reference.len());
        let mut best: Option<(usize, f32)> = None;

        for (offset, candidate) in reference.range(start, end).iter().enumerate() {
            let c = self.correctness(features, candidate);
            match best {
                Some((_, top)) if c <= top => {}
                _ => best = Some((start + offset, c)),
            }
        }

        best.map(|(idx, c)| MatchScore::new(c, Some(idx)))
    }
}

impl Aligner for LocalBestMatch {
    fn kind(&self) -> StrategyKind {
        StrategyKind::LocalBestMatch
    }

    fn observe(&mut self, frame: &PlayerFrame<'_>, reference: &ReferenceSequence) -> PmResult<Verdict> {
        if !frame.pose_found {
            return Ok(Verdict::NoPose);
        }

        let verdict = match self.best_match(frame.features, frame.frame_number, reference) {
            Some(score) => {
                debug!(
                    "Frame {} best match ref {:?} = {:.3}",
                    frame.frame_number, score.reference_frame, score.value
                );
                Verdict::Scored(score)
            }
            None => {
                debug!("Frame {} is outside the reference", frame.frame_number);
                Verdict::NoReference
            }
        };
        Ok(verdict)
    }

    fn reset(&mut self) {}
}
