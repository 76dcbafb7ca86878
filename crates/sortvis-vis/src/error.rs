//! Error types for sortvis-vis.

use thiserror::Error;

/// Result type for visualizer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the visualizer surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Playback controller error
    #[error(transparent)]
    Playback(#[from] sortvis_playback::Error),

    /// Kernel error, e.g. an unknown algorithm id
    #[error(transparent)]
    Kernel(#[from] sortvis_kernels::Error),

    /// Configuration value could not be used
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
