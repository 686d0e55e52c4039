//! Reference pose sequences loaded from a song's pose file.

use crate::error::{PmResult, PoseMatchError};
use crate::features::FeatureVector;
use posematch_protocol::reference::ReferenceRecord;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory under the game's install path that holds reference files.
pub const POSE_DIR: &str = "PoseFiles";

/// `<app_path>/PoseFiles/<song_name>.json`.
pub fn resolve_reference_path(app_path: &str, song_name: &str) -> PmResult<PathBuf> {
    let name = song_name.trim();
    if name.is_empty()
        || name == "."
        || name.contains("..")
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(PoseMatchError::MalformedReference(format!(
            "invalid song name '{}'",
            song_name
        )));
    }
    Ok(Path::new(app_path)
        .join(POSE_DIR)
        .join(format!("{}.json", name)))
}

/// Immutable, indexable sequence of reference feature vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSequence {
    frames: Vec<FeatureVector>,
    feature_len: usize,
}

impl ReferenceSequence {
    pub fn from_frames(frames: Vec<FeatureVector>, feature_len: usize) -> PmResult<Self> {
        if frames.is_empty() {
            return Err(PoseMatchError::MalformedReference(
                "reference contains no frames".to_string(),
            ));
        }
        for (i, frame) in frames.iter().enumerate() {
            if frame.len() != feature_len {
                return Err(PoseMatchError::MalformedReference(format!(
                    "frame {} has {} angles, expected {}",
                    i,
                    frame.len(),
                    feature_len
                )));
            }
            if frame.iter().any(|v| !v.is_finite()) {
                return Err(PoseMatchError::MalformedReference(format!(
                    "frame {} contains a non-finite angle",
                    i
                )));
            }
        }
        Ok(Self {
            frames,
            feature_len,
        })
    }

    /// Loads a `.csv` or JSON reference file. Every failure, including a
    /// missing file, is reported as `MalformedReference`.
    pub fn load<P: AsRef<Path>>(path: P, feature_len: usize) -> PmResult<Self> {
        let path = path.as_ref();
        debug!("Loading reference from {:?}", path);

        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

        let result = File::open(path).map_err(PoseMatchError::from).and_then(|file| {
            let reader = BufReader::new(file);
            if is_csv {
                Self::from_csv_reader(reader, feature_len)
            } else {
                Self::from_json_reader(reader, feature_len)
            }
        });

        let sequence = result.map_err(|e| match e {
            PoseMatchError::MalformedReference(msg) => {
                PoseMatchError::MalformedReference(format!("{:?}: {}", path, msg))
            }
            other => PoseMatchError::MalformedReference(format!("{:?}: {}", path, other)),
        })?;

        info!(
            "Loaded reference {:?}: {} frames x {} angles",
            path,
            sequence.len(),
            sequence.feature_len
        );
        Ok(sequence)
    }

    pub fn from_json_reader<R: Read>(reader: R, feature_len: usize) -> PmResult<Self> {
        let records: Vec<ReferenceRecord> = serde_json::from_reader(reader)?;
        let frames = records
            .iter()
            .enumerate()
            .map(|(i, rec)| {
                rec.angles().map_err(|e| {
                    PoseMatchError::MalformedReference(format!("frame {}: {}", i, e))
                })
            })
            .collect::<PmResult<Vec<_>>>()?;
        Self::from_frames(frames, feature_len)
    }

    /// Header row, then `frame_number,timestamp,angle...` rows.
    pub fn from_csv_reader<R: Read>(reader: R, feature_len: usize) -> PmResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let mut frames = Vec::new();
        for (row_idx, result) in rdr.records().enumerate() {
            let rec = result?;
            let angles = rec
                .iter()
                .skip(2)
                .map(|field| {
                    field.trim().parse::<f32>().map_err(|_| {
                        PoseMatchError::MalformedReference(format!(
                            "row {}: '{}' is not a number",
                            row_idx + 1,
                            field
                        ))
                    })
                })
                .collect::<PmResult<Vec<f32>>>()?;
            frames.push(angles);
        }
        Self::from_frames(frames, feature_len)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn feature_len(&self) -> usize {
        self.feature_len
    }

    pub fn frames(&self) -> &[FeatureVector] {
        &self.frames
    }

    /// `None` past the end: no reference data for that frame.
    pub fn at(&self, index: usize) -> Option<&FeatureVector> {
        self.frames.get(index)
    }

    /// Frames `[start, end)` clamped to the sequence; empty when the clamped
    /// range is empty.
    pub fn range(&self, start: usize, end: usize) -> &[FeatureVector] {
        let end = end.min(self.frames.len());
        let start = start.min(end);
        &self.frames[start..end]
    }

    /// Frames `[center - before, center + after)`, clamped at both ends.
    pub fn window(&self, center: usize, before: usize, after: usize) -> &[FeatureVector] {
        self.range(center.saturating_sub(before), center.saturating_add(after))
    }

    pub fn to_records(&self) -> Vec<ReferenceRecord> {
        self.frames
            .iter()
            .enumerate()
            .map(|(i, angles)| ReferenceRecord::from_angles(i, None, angles))
            .collect()
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> PmResult<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.to_records())?;
        Ok(())
    }
}
