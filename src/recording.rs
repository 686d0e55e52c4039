//! Recorded landmark streams (JSON lines) and offline replay through a session.

use crate::error::{PmResult, PoseMatchError};
use crate::feedback::FeedbackSummary;
use crate::features::{FeatureExtractor, FeatureTracker};
use crate::pose::RecordedFrame;
use crate::reference::ReferenceSequence;
use crate::session::Session;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

/// One `RecordedFrame` per line; blank lines are skipped.
pub fn load_recording<P: AsRef<Path>>(path: P) -> PmResult<Vec<RecordedFrame>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut frames = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let frame: RecordedFrame = serde_json::from_str(&line)
            .map_err(|e| PoseMatchError::Decode(format!("{:?} line {}: {}", path, idx + 1, e)))?;
        frames.push(frame);
    }

    debug!("Read {} recorded frames from {:?}", frames.len(), path);
    Ok(frames)
}

pub fn save_recording<P: AsRef<Path>>(path: P, frames: &[RecordedFrame]) -> PmResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for frame in frames {
        serde_json::to_writer(&mut out, frame)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Turns a recorded performance into a reference sequence. Frames without
/// a pose reuse the previous frame's landmarks, or zeros at the start.
pub fn extract_reference(frames: &[RecordedFrame], extractor: FeatureExtractor) -> PmResult<ReferenceSequence> {
    let feature_len = extractor.feature_len();
    let mut tracker = FeatureTracker::new(extractor);
    let vectors = frames
        .iter()
        .map(|f| tracker.next(f.landmarks.as_ref()).features)
        .collect();
    ReferenceSequence::from_frames(vectors, feature_len)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplayStats {
    pub frames: usize,
    /// Frames that produced a reply for the client.
    pub replies: usize,
    pub scored: usize,
    pub errors: usize,
    pub mean_score: Option<f32>,
    pub summary: FeedbackSummary,
}

/// Feeds every frame through `session` the way a connection would. Errors
/// are counted and replay continues.
pub fn replay(session: &mut Session, frames: &[RecordedFrame]) -> ReplayStats {
    let mut stats = ReplayStats::default();
    let mut score_sum = 0.0f64;

    for frame in frames {
        stats.frames += 1;
        match session.frame(frame.landmarks.as_ref(), frame.frame_number) {
            Ok(report) => {
                if report.to_message().is_some() {
                    stats.replies += 1;
                }
                if let Some(score) = report.verdict.score() {
                    stats.scored += 1;
                    score_sum += score as f64;
                }
            }
            Err(e) => {
                warn!("Frame {}: {}", frame.frame_number, e);
                stats.errors += 1;
                stats.replies += 1;
            }
        }
    }

    if stats.scored > 0 {
        stats.mean_score = Some((score_sum / stats.scored as f64) as f32);
    }
    stats.summary = *session.summary();
    stats
}
