//! Sortvis Visualization
//!
//! Animated sorting with playback controls, served over HTTP and WebSocket.
//!
//! # Architecture
//!
//! - **Input**: random sequences, shuffling, and lenient parsing of
//!   comma-separated text
//! - **Pseudo-code**: per-algorithm listing and complexity notes
//! - **REST API**: load sequences, start / pause / resume / cancel runs,
//!   change speed
//! - **WebSocket**: streams every comparison, write and finalization of the
//!   active run to the front end
//!
//! # Usage
//!
//! ```ignore
//! let server = VisServer::new(VisConfig::from_env()?)?;
//! server.serve().await?;
//! ```

mod config;
mod error;
mod input;
mod pseudocode;
mod server;

pub use config::{Theme, VisConfig};
pub use error::{Error, Result};
pub use input::{parse_custom, SequenceSource};
pub use pseudocode::{clipboard_text, complexity, pseudo_code, AlgorithmDoc, Complexity};
pub use server::{AppState, StartRequest, VisServer};
