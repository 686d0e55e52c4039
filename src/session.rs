//! Per-connection scoring session: reference selection and the frame pipeline.

use crate::config::{ScoringParams, StrategyKind};
use crate::error::{PmResult, PoseMatchError};
use crate::feedback::{FeedbackLabel, FeedbackSummary};
use crate::features::{FeatureExtractor, FeatureTracker};
use crate::pose::LandmarkSet;
use crate::protocol::ServerMessage;
use crate::reference::ReferenceSequence;
use crate::scorer::{build_aligner, Aligner, PlayerFrame, ScoreAggregator, Verdict, WindowReport};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

#[derive(Debug)]
struct ActiveReference {
    song: String,
    reference: ReferenceSequence,
}

/// Outcome of one scored frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_number: usize,
    pub strategy: StrategyKind,
    pub verdict: Verdict,
    /// Label of this frame's score; `Unclear` when there was none.
    pub feedback: FeedbackLabel,
    /// Set when this frame closed an aggregation window.
    pub window: Option<WindowReport>,
}

impl FrameReport {
    /// Reply for the client, if this frame produces one.
    pub fn to_message(&self) -> Option<ServerMessage> {
        match (self.strategy, self.verdict) {
            (StrategyKind::WindowedDtw, Verdict::Scored(score)) => Some(ServerMessage::DtwScore {
                dtw_score: score.value,
            }),
            (StrategyKind::WindowedDtw, Verdict::NoPose) => Some(ServerMessage::no_pose()),
            (StrategyKind::WindowedDtw, _) => None,

            (StrategyKind::LocalBestMatch, Verdict::Scored(score)) => Some(ServerMessage::Correctness {
                correctness: score.value,
                feedback: Some(self.feedback),
                reference_frame: score.reference_frame,
            }),
            (StrategyKind::LocalBestMatch, _) => Some(ServerMessage::Correctness {
                correctness: 0.0,
                feedback: None,
                reference_frame: None,
            }),
        }
    }
}

/// Owns everything one player's scoring needs. Nothing here is shared
/// between sessions.
#[derive(Debug)]
pub struct Session {
    params: ScoringParams,
    tracker: FeatureTracker,
    aligner: Box<dyn Aligner>,
    aggregator: ScoreAggregator,
    active: Option<ActiveReference>,
}

impl Session {
    pub fn new(params: ScoringParams) -> PmResult<Self> {
        params.validate().map_err(PoseMatchError::Validation)?;
        Ok(Self {
            tracker: FeatureTracker::new(FeatureExtractor::new(params.joint_set)),
            aligner: build_aligner(&params),
            aggregator: ScoreAggregator::new(params.aggregate_interval),
            active: None,
            params,
        })
    }

    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    pub fn strategy(&self) -> StrategyKind {
        self.aligner.kind()
    }

    pub fn state(&self) -> SessionState {
        match self.active {
            Some(_) => SessionState::Active,
            None => SessionState::Idle,
        }
    }

    pub fn song(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.song.as_str())
    }

    pub fn reference(&self) -> Option<&ReferenceSequence> {
        self.active.as_ref().map(|a| &a.reference)
    }

    pub fn summary(&self) -> &FeedbackSummary {
        self.aggregator.summary()
    }

    pub fn frames_seen(&self) -> u64 {
        self.aggregator.frames_seen()
    }

    /// Loads `path` and makes it the active reference. On failure the
    /// session keeps its previous reference and counters.
    pub fn select_reference<P: AsRef<Path>>(&mut self, song: &str, path: P) -> PmResult<()> {
        let reference = ReferenceSequence::load(path, self.tracker.extractor().feature_len())?;
        self.install_reference(song, reference)
    }

    /// Replaces the active reference and clears every buffer and counter.
    pub fn install_reference(&mut self, song: &str, reference: ReferenceSequence) -> PmResult<()> {
        let expected = self.tracker.extractor().feature_len();
        if reference.feature_len() != expected {
            return Err(PoseMatchError::MalformedReference(format!(
                "'{}' has {} angles per frame, expected {}",
                song,
                reference.feature_len(),
                expected
            )));
        }

        self.tracker.reset();
        self.aligner.reset();
        self.aggregator.reset();
        info!("Song '{}' selected: {} reference frames", song, reference.len());
        self.active = Some(ActiveReference {
            song: song.to_string(),
            reference,
        });
        Ok(())
    }

    /// Runs one frame through extraction, alignment and aggregation.
    /// `landmarks` is `None` when the detector found no pose.
    pub fn frame(&mut self, landmarks: Option<&LandmarkSet>, frame_number: usize) -> PmResult<FrameReport> {
        let active = self.active.as_ref().ok_or(PoseMatchError::NoReferenceSelected)?;

        let extraction = self.tracker.next(landmarks);
        let player = PlayerFrame {
            frame_number,
            features: &extraction.features,
            pose_found: extraction.pose_found,
        };
        let outcome = self.aligner.observe(&player, &active.reference);

        // A failed comparison still counts toward the aggregation cadence
        let score = outcome.as_ref().ok().and_then(Verdict::score);
        let (feedback, window) = self.aggregator.observe(score);
        if let Some(report) = &window {
            info!(
                "Frame {} ({} seen): window average {:?}, mode {:?}",
                frame_number, report.frame_count, report.average, report.mode
            );
        }

        let verdict = outcome?;
        debug!("Frame {}: {:?} -> {}", frame_number, verdict, feedback);
        Ok(FrameReport {
            frame_number,
            strategy: self.aligner.kind(),
            verdict,
            feedback,
            window,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::feature_len;

    fn session(strategy: StrategyKind) -> Session {
        let params = ScoringParams {
            strategy,
            ..ScoringParams::default()
        };
        Session::new(params).unwrap()
    }

    fn flat_reference(frames: usize, value: f32) -> ReferenceSequence {
        let n = feature_len(crate::config::JointSet::Primary);
        ReferenceSequence::from_frames(vec![vec![value; n]; frames], n).unwrap()
    }

    #[test]
    fn test_idle_session_rejects_frames() {
        let mut s = session(StrategyKind::LocalBestMatch);
        let err = s.frame(None, 0).unwrap_err();
        assert!(matches!(err, PoseMatchError::NoReferenceSelected));
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.frames_seen(), 0);
    }

    #[test]
    fn test_rejects_reference_of_wrong_width() {
        let mut s = session(StrategyKind::LocalBestMatch);
        let wide = ReferenceSequence::from_frames(vec![vec![0.0; 10]], 10).unwrap();
        assert!(s.install_reference("wide", wide).is_err());
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_local_no_pose_answers_zero() {
        let mut s = session(StrategyKind::LocalBestMatch);
        s.install_reference("flat", flat_reference(40, 0.0)).unwrap();
        let report = s.frame(None, 5).unwrap();
        assert_eq!(report.verdict, Verdict::NoPose);
        assert_eq!(
            report.to_message(),
            Some(ServerMessage::Correctness {
                correctness: 0.0,
                feedback: None,
                reference_frame: None
            })
        );
    }

    #[test]
    fn test_dtw_no_pose_answers_error() {
        let mut s = session(StrategyKind::WindowedDtw);
        s.install_reference("flat", flat_reference(40, 0.0)).unwrap();
        let report = s.frame(None, 0).unwrap();
        assert_eq!(report.to_message(), Some(ServerMessage::no_pose()));
    }

    #[test]
    fn test_new_reference_resets_counters() {
        let mut s = session(StrategyKind::LocalBestMatch);
        s.install_reference("flat", flat_reference(40, 0.0)).unwrap();
        s.frame(None, 0).unwrap();
        assert_eq!(s.frames_seen(), 1);

        s.install_reference("again", flat_reference(40, 0.0)).unwrap();
        assert_eq!(s.frames_seen(), 0);
        assert_eq!(s.song(), Some("again"));
    }
}
