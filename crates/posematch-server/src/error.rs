use thiserror::Error;

/// Failures that stop the server from starting.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sidecar error: {0}")]
    Sidecar(String),
}

pub type AppResult<T> = Result<T, AppError>;
