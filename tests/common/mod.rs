#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use posematch::config::JointSet;
use posematch::features::{FeatureExtractor, FeatureVector};
use posematch::pose::{DetectionPayload, Landmark, LandmarkSet, POSE_LANDMARK_COUNT};
use posematch::reference::{ReferenceSequence, POSE_DIR};
use std::fs;
use std::path::{Path, PathBuf};

/// A plausible standing pose; `phase` bends elbows and knees a little.
pub fn pose(phase: f32) -> LandmarkSet {
    let mut points: Vec<Landmark> = (0..POSE_LANDMARK_COUNT)
        .map(|i| Landmark::new(0.3 + (i % 7) as f32 * 0.05, 0.1 + (i / 3) as f32 * 0.05))
        .collect();

    let mut set = |i: usize, x: f32, y: f32| points[i] = Landmark::new(x, y);
    set(11, 0.40, 0.30); // shoulders
    set(12, 0.60, 0.30);
    set(13, 0.35, 0.45 + phase * 0.05); // elbows
    set(14, 0.65, 0.45 - phase * 0.05);
    set(15, 0.33, 0.60); // wrists
    set(16, 0.67, 0.60);
    set(23, 0.44, 0.60); // hips
    set(24, 0.56, 0.60);
    set(25, 0.43 - phase * 0.03, 0.75); // knees
    set(26, 0.57 + phase * 0.03, 0.75);
    set(27, 0.43, 0.90); // ankles
    set(28, 0.57, 0.90);

    LandmarkSet::new(points)
}

pub fn angles_of(set: &LandmarkSet) -> FeatureVector {
    FeatureExtractor::new(JointSet::Primary).angles(set)
}

pub fn reference_of(frames: Vec<FeatureVector>) -> ReferenceSequence {
    let n = frames[0].len();
    ReferenceSequence::from_frames(frames, n).unwrap()
}

/// Writes `<app_path>/PoseFiles/<song>.json` and returns the path.
pub fn write_song(app_path: &Path, song: &str, reference: &ReferenceSequence) -> PathBuf {
    let dir = app_path.join(POSE_DIR);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{}.json", song));
    reference.save_json(&path).unwrap();
    path
}

/// `image_data` for the JSON landmark detector.
pub fn image_data(landmarks: Option<&LandmarkSet>) -> String {
    let payload = DetectionPayload {
        landmarks: landmarks.cloned(),
    };
    STANDARD.encode(serde_json::to_vec(&payload).unwrap())
}

pub fn frame_message(frame_number: usize, landmarks: Option<&LandmarkSet>) -> String {
    serde_json::json!({
        "type": "frame_data",
        "frame_number": frame_number,
        "image_data": image_data(landmarks),
        "flip": false,
    })
    .to_string()
}

pub fn song_message(song: &str, app_path: &Path) -> String {
    serde_json::json!({
        "type": "song_selection",
        "song_name": song,
        "app_path": app_path.to_str().unwrap(),
    })
    .to_string()
}
