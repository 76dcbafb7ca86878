//! Controller configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sortvis_kernels::MAX_SEQUENCE_LEN;

use crate::speed::Speed;

/// Configuration for a [`Controller`](crate::Controller).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Longest sequence the controller accepts
    pub max_len: usize,
    /// Upper bound on how long a paused run waits before re-checking its status
    pub pause_poll_interval: Duration,
    /// Speed used until `set_speed` is called
    pub speed: Speed,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_len: MAX_SEQUENCE_LEN,
            pause_poll_interval: Duration::from_millis(100),
            speed: Speed::default(),
        }
    }
}

impl PlaybackConfig {
    #[must_use]
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    #[must_use]
    pub fn with_pause_poll_interval(mut self, interval: Duration) -> Self {
        self.pause_poll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }
}
