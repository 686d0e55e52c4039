//! Body landmarks as produced by an external pose-estimation model.
//!
//! Indices follow the 33-point MediaPipe pose topology: a joint's identity is
//! its position in the list.

use serde::{Deserialize, Serialize};

/// Number of points in a full MediaPipe pose.
pub const POSE_LANDMARK_COUNT: usize = 33;

pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// Left/right counterparts swapped when the image is mirrored.
pub const MIRROR_PAIRS: [(usize, usize); 16] = [
    (1, 4),
    (2, 5),
    (3, 6),
    (7, 8),
    (9, 10),
    (11, 12),
    (13, 14),
    (15, 16),
    (17, 18),
    (19, 20),
    (21, 22),
    (23, 24),
    (25, 26),
    (27, 28),
    (29, 30),
    (31, 32),
];

/// A single keypoint in normalized image coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default)]
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: 1.0,
        }
    }

    /// The model reports (0, 0) for a joint it failed to localize.
    pub fn is_degenerate(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// All landmarks of one detected pose.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    pub points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    /// The pose as seen in a horizontally flipped image.
    pub fn mirrored(&self) -> Self {
        let mut points: Vec<Landmark> = self
            .points
            .iter()
            .map(|p| Landmark {
                x: if p.is_degenerate() { p.x } else { 1.0 - p.x },
                ..*p
            })
            .collect();

        for &(l, r) in MIRROR_PAIRS.iter() {
            if l < points.len() && r < points.len() {
                points.swap(l, r);
            }
        }
        Self { points }
    }
}

/// Detector output on the wire: `landmarks` is null when no pose was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionPayload {
    #[serde(default)]
    pub landmarks: Option<LandmarkSet>,
}

/// Detector input for an out-of-process pose model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRequest {
    /// Base64 of the encoded still image.
    pub image: String,
    pub flip: bool,
}

/// One line of a recorded landmark stream (JSON lines).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub frame_number: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub landmarks: Option<LandmarkSet>,
}
