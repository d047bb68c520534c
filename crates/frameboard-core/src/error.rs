//! Error types for the frame layout core

use thiserror::Error;

/// Result type alias for frame layout operations
pub type FrameResult<T> = Result<T, FrameboardError>;

/// Errors that can occur while loading, saving, or editing the frame layout.
///
/// None of these are fatal to the dashboard: callers degrade to the local
/// cache or an empty layout and keep the in-memory state.
#[derive(Error, Debug)]
pub enum FrameboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed layout document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend store returned status {0}")]
    Backend(u16),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No frame with id {0}")]
    UnknownFrame(u32),
}

impl From<config::ConfigError> for FrameboardError {
    fn from(err: config::ConfigError) -> Self {
        FrameboardError::Config(err.to_string())
    }
}
