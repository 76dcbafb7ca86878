//! Sortvis Playback
//!
//! Drives an instrumented sort at animation speed.
//!
//! # Architecture
//!
//! - **Controller**: owns the working sequence, applies trace events in
//!   order, and exposes pause / resume / cancel / speed controls
//! - **Stats**: comparison and mutation counters plus a wall clock that
//!   freezes when the run ends
//! - **Observer**: receives one notification per applied change, with the
//!   sequence needed to redraw
//!
//! # Usage
//!
//! ```ignore
//! let controller = Controller::default();
//! let handle = controller
//!     .start(vec![5, 3, 8, 1], AlgorithmKind::Bubble, Speed::default(), NullObserver)
//!     .await?;
//!
//! controller.pause()?;
//! controller.resume()?;
//!
//! let stats = handle.join().await?;
//! assert_eq!(stats.comparisons, 6);
//! ```

mod config;
mod controller;
mod error;
mod observer;
mod speed;
mod stats;

pub use config::PlaybackConfig;
pub use controller::{Controller, RunHandle};
pub use error::{Error, Result};
pub use observer::{
    ChannelObserver, Notification, NullObserver, Observer, PlaybackSnapshot, PlaybackUpdate,
    Recorder,
};
pub use speed::{Speed, DEFAULT_SPEED_INDEX, SPEED_OPTIONS_MS};
pub use stats::{format_elapsed, RunStats, RunStatus};

pub use sortvis_kernels::{AlgorithmKind, Value};
