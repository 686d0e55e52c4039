//! Multi-horizon feedback counters for one session.

use super::feedback::{classify, majority};
use crate::feedback::{FeedbackLabel, FeedbackSummary};
use tracing::debug;

/// What happened at an aggregation boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowReport {
    /// Running frame total at which the window closed.
    pub frame_count: u64,
    /// Mean of the window's valid scores and its label.
    pub average: Option<(f32, FeedbackLabel)>,
    /// Majority of the window's per-frame labels.
    pub mode: Option<FeedbackLabel>,
}

#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    interval: u64,
    frames_seen: u64,
    summary: FeedbackSummary,
    window_scores: Vec<f32>,
    window_labels: Vec<FeedbackLabel>,
}

impl ScoreAggregator {
    pub fn new(interval: usize) -> Self {
        let interval = interval.max(1);
        Self {
            interval: interval as u64,
            frames_seen: 0,
            summary: FeedbackSummary::default(),
            window_scores: Vec::with_capacity(interval),
            window_labels: Vec::with_capacity(interval),
        }
    }

    /// Records one frame. `None` means no valid score this frame: it still
    /// advances the frame total but is never counted.
    pub fn observe(&mut self, score: Option<f32>) -> (FeedbackLabel, Option<WindowReport>) {
        self.frames_seen += 1;

        let label = match score {
            Some(s) => {
                let label = classify(s);
                self.summary.frame.increment(label);
                self.window_scores.push(s);
                self.window_labels.push(label);
                label
            }
            None => FeedbackLabel::Unclear,
        };

        if self.frames_seen % self.interval != 0 {
            return (label, None);
        }

        let average = if self.window_scores.is_empty() {
            None
        } else {
            let mean = self.window_scores.iter().sum::<f32>() / self.window_scores.len() as f32;
            let avg_label = classify(mean);
            self.summary.rolling_average.increment(avg_label);
            Some((mean, avg_label))
        };

        let mode = match majority(&self.window_labels) {
            FeedbackLabel::Unclear => None,
            mode_label => {
                self.summary.rolling_mode.increment(mode_label);
                Some(mode_label)
            }
        };

        self.window_scores.clear();
        self.window_labels.clear();

        let report = WindowReport {
            frame_count: self.frames_seen,
            average,
            mode,
        };
        debug!("Window closed: {:?}", report);
        (label, Some(report))
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    pub fn summary(&self) -> &FeedbackSummary {
        &self.summary
    }

    pub fn reset(&mut self) {
        self.frames_seen = 0;
        self.summary = FeedbackSummary::default();
        self.window_scores.clear();
        self.window_labels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_counts_frames_without_scores() {
        let mut agg = ScoreAggregator::new(3);
        assert!(agg.observe(None).1.is_none());
        assert!(agg.observe(Some(0.5)).1.is_none());
        let (label, report) = agg.observe(None);
        assert_eq!(label, FeedbackLabel::Unclear);

        let report = report.unwrap();
        assert_eq!(report.frame_count, 3);
        assert_eq!(report.average, Some((0.5, FeedbackLabel::Passable)));
        assert_eq!(report.mode, Some(FeedbackLabel::Passable));
        assert_eq!(agg.summary().frame.passable, 1);
    }

    #[test]
    fn test_window_without_scores_adds_nothing() {
        let mut agg = ScoreAggregator::new(2);
        agg.observe(None);
        let (_, report) = agg.observe(None);
        let report = report.unwrap();
        assert_eq!(report.average, None);
        assert_eq!(report.mode, None);
        assert!(agg.summary().rolling_average.is_zero());
        assert!(agg.summary().rolling_mode.is_zero());
    }

    #[test]
    fn test_average_and_mode_track_separately() {
        // Mean 0.563 is passable; the majority label is not_good_enough.
        let mut agg = ScoreAggregator::new(3);
        agg.observe(Some(0.35));
        agg.observe(Some(0.35));
        let (_, report) = agg.observe(Some(0.99));
        let report = report.unwrap();
        assert_eq!(report.average.unwrap().1, FeedbackLabel::Passable);
        assert_eq!(report.mode, Some(FeedbackLabel::NotGoodEnough));
        assert_eq!(agg.summary().rolling_average.passable, 1);
        assert_eq!(agg.summary().rolling_mode.not_good_enough, 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut agg = ScoreAggregator::new(1);
        agg.observe(Some(0.9));
        assert_eq!(agg.summary().rolling_average.perfect, 1);
        agg.reset();
        assert_eq!(agg.frames_seen(), 0);
        assert_eq!(*agg.summary(), FeedbackSummary::default());
    }
}
