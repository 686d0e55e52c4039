pub mod api;
pub mod error;
pub mod features;
pub mod pose;
pub mod recording;
pub mod reference;
pub mod scorer;
pub mod session;

// Wire and configuration types live in the protocol crate so the server
// and clients can share them without pulling in the engine.
pub use posematch_protocol::{config, feedback, protocol};

pub use error::{PmResult, PoseMatchError};
pub use session::{FrameReport, Session, SessionState};
