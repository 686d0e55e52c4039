use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Discretized quality bucket for a correctness score, best first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeedbackLabel {
    Perfect,
    Cool,
    Passable,
    NotGoodEnough,
    /// No comparison was possible. Never counted.
    #[serde(alias = "none")]
    #[strum(to_string = "unclear", serialize = "none")]
    Unclear,
}

impl FeedbackLabel {
    /// The four labels that can be counted, in descending quality.
    pub const RANKED: [FeedbackLabel; 4] = [
        FeedbackLabel::Perfect,
        FeedbackLabel::Cool,
        FeedbackLabel::Passable,
        FeedbackLabel::NotGoodEnough,
    ];

    pub fn is_countable(self) -> bool {
        self != FeedbackLabel::Unclear
    }
}

/// Occurrence count per countable label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackCounts {
    pub perfect: u32,
    pub cool: u32,
    pub passable: u32,
    pub not_good_enough: u32,
}

impl FeedbackCounts {
    /// Returns false (and counts nothing) for the `Unclear` sentinel.
    pub fn increment(&mut self, label: FeedbackLabel) -> bool {
        match label {
            FeedbackLabel::Perfect => self.perfect += 1,
            FeedbackLabel::Cool => self.cool += 1,
            FeedbackLabel::Passable => self.passable += 1,
            FeedbackLabel::NotGoodEnough => self.not_good_enough += 1,
            FeedbackLabel::Unclear => return false,
        }
        true
    }

    pub fn get(&self, label: FeedbackLabel) -> u32 {
        match label {
            FeedbackLabel::Perfect => self.perfect,
            FeedbackLabel::Cool => self.cool,
            FeedbackLabel::Passable => self.passable,
            FeedbackLabel::NotGoodEnough => self.not_good_enough,
            FeedbackLabel::Unclear => 0,
        }
    }

    pub fn total(&self) -> u32 {
        self.perfect + self.cool + self.passable + self.not_good_enough
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }
}

/// Cumulative counters for the three feedback horizons of one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSummary {
    pub frame: FeedbackCounts,
    pub rolling_average: FeedbackCounts,
    pub rolling_mode: FeedbackCounts,
}
