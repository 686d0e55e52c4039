/// One player frame as seen by an alignment strategy.
#[derive(Debug, Clone, Copy)]
pub struct PlayerFrame<'a> {
    pub frame_number: usize,
    pub features: &'a [f32],
    /// False when the detector found no pose and `features` is a fallback.
    pub pose_found: bool,
}

/// A correctness score in [0, 1] and the reference frame it was matched to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    pub value: f32,
    pub reference_frame: Option<usize>,
}

impl MatchScore {
    pub fn new(value: f32, reference_frame: Option<usize>) -> Self {
        let value = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            value,
            reference_frame,
        }
    }
}

/// What a strategy concluded for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// Frame was buffered; no score yet.
    Pending,
    Scored(MatchScore),
    NoPose,
    /// Pose found, but the reference has nothing to compare it with.
    NoReference,
}

impl Verdict {
    pub fn score(&self) -> Option<f32> {
        match self {
            Verdict::Scored(m) => Some(m.value),
            _ => None,
        }
    }
}
