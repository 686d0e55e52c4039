use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoseMatchError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed reference: {0}")]
    MalformedReference(String),

    #[error("No reference selected")]
    NoReferenceSelected,

    #[error("Empty alignment window: reference frames [{start}, {end}) of {reference_len}")]
    EmptyAlignmentWindow {
        start: usize,
        end: usize,
        reference_len: usize,
    },

    #[error("Decode Error: {0}")]
    Decode(String),

    #[error("Pose detector failed: {0}")]
    Detector(String),

    #[error("Validation Error: {0}")]
    Validation(String),
}

pub type PmResult<T> = Result<T, PoseMatchError>;
