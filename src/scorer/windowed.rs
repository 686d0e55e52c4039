//! Buffered elastic alignment: one score per full block of player frames.

use super::dtw::elastic_distance;
use super::engine::Aligner;
use super::types::{MatchScore, PlayerFrame, Verdict};
use crate::config::StrategyKind;
use crate::error::{PmResult, PoseMatchError};
use crate::features::FeatureVector;
use crate::reference::ReferenceSequence;
use std::collections::VecDeque;
use std::f32::consts::PI;
use tracing::{debug, info};

/// Maps angles from [0, π] to [0, 1].
pub fn normalize_angles(angles: &[f32]) -> FeatureVector {
    angles.iter().map(|a| a / PI).collect()
}

#[derive(Debug, Clone)]
pub struct WindowedDtw {
    capacity: usize,
    offset: usize,
    /// (frame number, raw features), oldest first
    buffer: VecDeque<(usize, FeatureVector)>,
}

impl WindowedDtw {
    pub fn new(capacity: usize, offset: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            offset,
            buffer: VecDeque::with_capacity(capacity + 1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn push(&mut self, frame_number: usize, features: &[f32]) {
        self.buffer.push_back((frame_number, features.to_vec()));
        while self.buffer.len() > self.capacity {
            self.buffer.pop_front();
        }
    }

    /// Reference frames `[first - offset, last + offset)` for the buffered
    /// frame numbers, clamped to the sequence. `start <= end` always holds;
    /// past the end of the reference the range is empty.
    pub fn reference_bounds(&self, reference_len: usize) -> (usize, usize) {
        let first = self.buffer.front().map(|(f, _)| *f).unwrap_or(0);
        let last = self.buffer.back().map(|(f, _)| *f).unwrap_or(0);
        let end = last.saturating_add(self.offset).min(reference_len);
        let start = first.saturating_sub(self.offset).min(end);
        (start, end)
    }

    /// Scores and empties the buffer. The buffer is emptied on failure too.
    fn score_buffer(&mut self, reference: &ReferenceSequence) -> PmResult<MatchScore> {
        let (start, end) = self.reference_bounds(reference.len());
        let player: Vec<FeatureVector> = self
            .buffer
            .drain(..)
            .map(|(_, features)| normalize_angles(&features))
            .collect();

        let window: Vec<FeatureVector> = reference
            .range(start, end)
            .iter()
            .map(|frame| normalize_angles(frame))
            .collect();

        let alignment = elastic_distance(&player, &window).ok_or(
            PoseMatchError::EmptyAlignmentWindow {
                start,
                end,
                reference_len: reference.len(),
            },
        )?;

        let score = MatchScore::new(alignment.score(), Some(start));
        info!(
            "DTW block ref [{}, {}): distance {:.4} over {} pairs -> score {:.3}",
            start, end, alignment.distance, alignment.path_len, score.value
        );
        Ok(score)
    }
}

impl Aligner for WindowedDtw {
    fn kind(&self) -> StrategyKind {
        StrategyKind::WindowedDtw
    }

    fn observe(&mut self, frame: &PlayerFrame<'_>, reference: &ReferenceSequence) -> PmResult<Verdict> {
        self.push(frame.frame_number, frame.features);

        // Fallback vectors keep the buffer's timing but never trigger a score
        if !frame.pose_found {
            debug!("Frame {} padded without pose", frame.frame_number);
            return Ok(Verdict::NoPose);
        }

        if self.buffer.len() < self.capacity {
            return Ok(Verdict::Pending);
        }

        self.score_buffer(reference).map(Verdict::Scored)
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }
}
