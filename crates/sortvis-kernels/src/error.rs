//! Error types for sortvis-kernels.

use thiserror::Error;

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while tracing a sort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input cannot be handled by the requested kernel.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An algorithm identifier did not name a known kernel.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}

impl Error {
    pub(crate) fn empty(kernel: &str) -> Self {
        Error::InvalidInput(format!("{kernel} requires at least one element"))
    }
}
