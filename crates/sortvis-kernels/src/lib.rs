//! Sortvis Kernels
//!
//! Instrumented comparison sorts that describe their own progress.
//!
//! Instead of mutating a caller's buffer, each kernel sorts a private copy
//! and records every step as an [`Event`]:
//!
//! - `Compare` when two positions are compared
//! - `Swap` / `Assign` when the sequence is written
//! - `Finalize` / `FinalizeRange` when positions reach their sorted value
//!
//! The ordered [`Trace`] is the only output. Replaying it against the input
//! reproduces the sorted sequence, so a consumer can animate, pause, or
//! abandon the run at any event boundary without the kernel's involvement.
//!
//! # Usage
//!
//! ```
//! use sortvis_kernels::AlgorithmKind;
//!
//! let input = [5, 3, 8, 1];
//! let trace = AlgorithmKind::Bubble.trace(&input).unwrap();
//!
//! assert_eq!(trace.replay(&input), vec![1, 3, 5, 8]);
//! assert_eq!(trace.summary().comparisons, 6);
//! ```

mod algorithm;
mod bubble;
mod error;
mod event;
mod insertion;
mod merge;
mod quick;
mod selection;

pub use algorithm::{AlgorithmKind, Kernel};
pub use bubble::Bubble;
pub use error::{Error, Result};
pub use event::{Event, Trace, TraceSummary};
pub use insertion::Insertion;
pub use merge::Merge;
pub use quick::Quick;
pub use selection::Selection;

/// Element type of every sequence the kernels sort.
pub type Value = i64;

/// Default upper bound on sequence length.
pub const MAX_SEQUENCE_LEN: usize = 350;
