use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};

/// Which alignment strategy a session scores frames with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StrategyKind {
    /// One elastic-distance score per full buffer of player frames.
    WindowedDtw,
    /// One best-local-match score per frame.
    LocalBestMatch,
}

/// Which joint-angle triplets make up a feature vector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JointSet {
    /// Elbows, shoulders, hips and knees: 8 angles.
    Primary,
    /// Primary plus both shoulder-girdle angles: 10 angles.
    Extended,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringParams {
    #[arg(long, default_value = "local_best_match")]
    pub strategy: StrategyKind,
    #[arg(long, default_value = "primary")]
    pub joint_set: JointSet,

    // === WINDOWED DTW ===
    #[arg(long, default_value_t = 30)]
    pub buffer_size: usize,
    #[arg(long, default_value_t = 0)]
    pub dtw_offset: usize,

    // === LOCAL BEST MATCH ===
    #[arg(long, default_value_t = 12)]
    pub window_before: usize,
    #[arg(long, default_value_t = 4)]
    pub window_after: usize,
    #[arg(long, default_value_t = 1.0)]
    pub max_angle_diff: f32,

    // === AGGREGATION ===
    #[arg(long, default_value_t = 30)]
    pub aggregate_interval: usize,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::LocalBestMatch,
            joint_set: JointSet::Primary,
            buffer_size: 30,
            dtw_offset: 0,
            window_before: 12,
            window_after: 4,
            max_angle_diff: 1.0,
            aggregate_interval: 30,
        }
    }
}

impl ScoringParams {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scoring profile {:?}: {}", path, e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse scoring profile {:?}: {}", path, e))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.buffer_size == 0 {
            return Err("buffer_size must be at least 1".to_string());
        }
        if self.aggregate_interval == 0 {
            return Err("aggregate_interval must be at least 1".to_string());
        }
        if !(self.max_angle_diff.is_finite() && self.max_angle_diff > 0.0) {
            return Err("max_angle_diff must be a positive number".to_string());
        }
        Ok(())
    }

    /// Overwrites profile values with flags the user typed explicitly.
    pub fn merge_from_cli(&mut self, cli_params: &ScoringParams, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$field = cli_params.$field.clone();
                }
            };
        }

        update_if_present!(strategy);
        update_if_present!(joint_set);
        update_if_present!(buffer_size);
        update_if_present!(dtw_offset);
        update_if_present!(window_before);
        update_if_present!(window_after);
        update_if_present!(max_angle_diff);
        update_if_present!(aggregate_interval);
    }
}
