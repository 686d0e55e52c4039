pub mod aggregator;
pub mod dtw;
pub mod engine;
pub mod feedback;
pub mod local;
pub mod types;
pub mod windowed;

pub use self::aggregator::{ScoreAggregator, WindowReport};
pub use self::engine::{build_aligner, Aligner};
pub use self::feedback::{classify, majority};
pub use self::local::LocalBestMatch;
pub use self::types::{MatchScore, PlayerFrame, Verdict};
pub use self::windowed::WindowedDtw;
