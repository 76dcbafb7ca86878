//! Run status and statistics.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No run has started since the sequence was loaded or reset
    #[default]
    Idle,
    /// Events are being applied
    Running,
    /// Event application is suspended until resumed or cancelled
    Paused,
    /// The trace was applied in full
    Finished,
    /// The run was stopped before the trace was exhausted
    Cancelled,
}

impl RunStatus {
    /// Whether a run is in progress (running or paused).
    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self, RunStatus::Running | RunStatus::Paused)
    }

    /// Whether the run has ended.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Finished | RunStatus::Cancelled)
    }
}

/// Counters and clock for the current run. Owned by the controller.
#[derive(Debug, Clone, Default)]
pub(crate) struct RunState {
    pub(crate) comparisons: u64,
    pub(crate) mutations: u64,
    started_at: Option<Instant>,
    frozen: Option<Duration>,
}

impl RunState {
    pub(crate) fn started(now: Instant) -> Self {
        Self {
            started_at: Some(now),
            ..Self::default()
        }
    }

    /// Stop the clock. Later calls keep the first reading.
    pub(crate) fn freeze(&mut self, now: Instant) {
        if self.frozen.is_none() {
            self.frozen = Some(self.elapsed_at(now));
        }
    }

    pub(crate) fn elapsed_at(&self, now: Instant) -> Duration {
        match (self.frozen, self.started_at) {
            (Some(frozen), _) => frozen,
            (None, Some(start)) => now.saturating_duration_since(start),
            (None, None) => Duration::ZERO,
        }
    }

    pub(crate) fn stats(&self, status: RunStatus) -> RunStats {
        let elapsed = self.elapsed_at(Instant::now());
        RunStats {
            status,
            comparisons: self.comparisons,
            mutations: self.mutations,
            elapsed_secs: elapsed.as_secs_f64(),
            elapsed: format_elapsed(elapsed),
        }
    }
}

/// Point-in-time statistics for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub status: RunStatus,
    pub comparisons: u64,
    pub mutations: u64,
    pub elapsed_secs: f64,
    /// Elapsed seconds with two decimals, e.g. `"1.25s"`.
    pub elapsed: String,
}

impl Default for RunStats {
    fn default() -> Self {
        RunState::default().stats(RunStatus::Idle)
    }
}

/// Format a duration as seconds with two decimals.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}
