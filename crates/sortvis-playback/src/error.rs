//! Error types for sortvis-playback.

use thiserror::Error;

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while controlling a run.
#[derive(Debug, Error)]
pub enum Error {
    /// The sequence or setting is out of bounds.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A run is already active.
    #[error("a run is already in progress")]
    AlreadyRunning,

    /// No run is active.
    #[error("no run is in progress")]
    NotRunning,

    /// The kernel refused the input.
    #[error("kernel error: {0}")]
    Kernel(#[from] sortvis_kernels::Error),

    /// The playback task panicked or was aborted.
    #[error("playback task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
