//! Joint-angle features computed from body landmarks.

use crate::config::JointSet;
use crate::pose::{
    Landmark, LandmarkSet, LEFT_ANKLE, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST, RIGHT_ANKLE,
    RIGHT_ELBOW, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};

/// Relative joint angles in radians, one per configured triplet.
pub type FeatureVector = Vec<f32>;

/// `(a, b, c)`: the angle is measured at `b`, between rays `b→a` and `b→c`.
pub type JointTriplet = (usize, usize, usize);

const PRIMARY_TRIPLETS: [JointTriplet; 8] = [
    (LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST),
    (RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST),
    (LEFT_ELBOW, LEFT_SHOULDER, LEFT_HIP),
    (LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE),
    (LEFT_HIP, LEFT_KNEE, LEFT_ANKLE),
    (RIGHT_ELBOW, RIGHT_SHOULDER, RIGHT_HIP),
    (RIGHT_SHOULDER, RIGHT_HIP, RIGHT_KNEE),
    (RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE),
];

/// Primary set plus the two torso-twist angles at the shoulders.
const EXTENDED_TRIPLETS: [JointTriplet; 10] = [
    PRIMARY_TRIPLETS[0],
    PRIMARY_TRIPLETS[1],
    PRIMARY_TRIPLETS[2],
    PRIMARY_TRIPLETS[3],
    PRIMARY_TRIPLETS[4],
    PRIMARY_TRIPLETS[5],
    PRIMARY_TRIPLETS[6],
    PRIMARY_TRIPLETS[7],
    (LEFT_SHOULDER, RIGHT_SHOULDER, RIGHT_HIP),
    (RIGHT_SHOULDER, LEFT_SHOULDER, LEFT_HIP),
];

const MIN_RAY_LEN: f64 = 1e-9;

pub fn triplets(joint_set: JointSet) -> &'static [JointTriplet] {
    match joint_set {
        JointSet::Primary => &PRIMARY_TRIPLETS,
        JointSet::Extended => &EXTENDED_TRIPLETS,
    }
}

pub fn feature_len(joint_set: JointSet) -> usize {
    triplets(joint_set).len()
}

/// Angle at `b` in [0, π]. Returns 0.0 when either ray has no length or
/// the coordinates are not finite.
pub fn relative_angle(a: &Landmark, b: &Landmark, c: &Landmark) -> f32 {
    // f64 so squared lengths of far-out coordinates cannot overflow
    let ba = (a.x as f64 - b.x as f64, a.y as f64 - b.y as f64);
    let bc = (c.x as f64 - b.x as f64, c.y as f64 - b.y as f64);

    let dot = ba.0 * bc.0 + ba.1 * bc.1;
    let mag_ba = ba.0.hypot(ba.1);
    let mag_bc = bc.0.hypot(bc.1);

    if !(mag_ba > MIN_RAY_LEN && mag_bc > MIN_RAY_LEN) {
        return 0.0;
    }

    let cosine = dot / (mag_ba * mag_bc);
    if !cosine.is_finite() {
        return 0.0;
    }
    // Rounding can push the cosine just past ±1
    cosine.clamp(-1.0, 1.0).acos() as f32
}

/// Stateless mapping from a landmark set to a fixed-length feature vector.
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor {
    joint_set: JointSet,
}

impl FeatureExtractor {
    pub fn new(joint_set: JointSet) -> Self {
        Self { joint_set }
    }

    pub fn joint_set(&self) -> JointSet {
        self.joint_set
    }

    pub fn feature_len(&self) -> usize {
        feature_len(self.joint_set)
    }

    pub fn zeros(&self) -> FeatureVector {
        vec![0.0; self.feature_len()]
    }

    /// Replaces each degenerate (or missing) joint of `current` with the same
    /// joint from `previous`, leaving every other joint untouched.
    pub fn fill_gaps(&self, current: &LandmarkSet, previous: Option<&LandmarkSet>) -> LandmarkSet {
        let Some(previous) = previous else {
            return current.clone();
        };

        let len = current.len().max(previous.len());
        let points = (0..len)
            .map(|i| match (current.get(i), previous.get(i)) {
                (Some(cur), Some(prev)) if cur.is_degenerate() => *prev,
                (Some(cur), _) => *cur,
                (None, Some(prev)) => *prev,
                (None, None) => Landmark::default(),
            })
            .collect();
        LandmarkSet::new(points)
    }

    pub fn angles(&self, landmarks: &LandmarkSet) -> FeatureVector {
        let point = |i: usize| landmarks.get(i).copied().unwrap_or_default();
        triplets(self.joint_set)
            .iter()
            .map(|&(a, b, c)| relative_angle(&point(a), &point(b), &point(c)))
            .collect()
    }
}

/// Result of extracting one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub features: FeatureVector,
    /// Whether the frame itself contained a pose.
    pub pose_found: bool,
}

/// Extractor plus the last frame's gap-filled landmarks.
#[derive(Debug, Clone)]
pub struct FeatureTracker {
    extractor: FeatureExtractor,
    previous: Option<LandmarkSet>,
}

impl FeatureTracker {
    pub fn new(extractor: FeatureExtractor) -> Self {
        Self {
            extractor,
            previous: None,
        }
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Without a pose the previous frame's landmarks stand in; without
    /// those the vector is all zeros.
    pub fn next(&mut self, detected: Option<&LandmarkSet>) -> Extraction {
        match detected {
            Some(current) => {
                let filled = self.extractor.fill_gaps(current, self.previous.as_ref());
                let features = self.extractor.angles(&filled);
                self.previous = Some(filled);
                Extraction {
                    features,
                    pose_found: true,
                }
            }
            None => {
                let features = match &self.previous {
                    Some(prev) => self.extractor.angles(prev),
                    None => self.extractor.zeros(),
                };
                Extraction {
                    features,
                    pose_found: false,
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }
}
