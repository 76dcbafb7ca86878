//! Notifications delivered to the rendering side.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use sortvis_kernels::{AlgorithmKind, Value};
use tokio::sync::broadcast;

use crate::speed::Speed;
use crate::stats::RunStats;

/// One change the renderer should reflect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// Positions `i` and `j` are being compared
    Comparing { i: usize, j: usize },
    /// Position `index` now holds `value`
    Mutated { index: usize, value: Value },
    /// Positions `start..end` hold their final values
    Finalized { start: usize, end: usize },
    /// Counters or status changed
    Stats(RunStats),
    /// The run ended; carries the frozen statistics
    Completed(RunStats),
}

/// Receives notifications from the playback loop.
///
/// `sequence` is the working sequence after the notified change, enough to
/// redraw every bar. Implementations run on the playback task and should
/// return quickly.
pub trait Observer: Send {
    fn notify(&mut self, notification: &Notification, sequence: &[Value]);
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn notify(&mut self, _notification: &Notification, _sequence: &[Value]) {}
}

/// Collects notifications in memory. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    log: Arc<Mutex<Vec<Notification>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of everything recorded so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// Number of notifications recorded so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Observer for Recorder {
    fn notify(&mut self, notification: &Notification, _sequence: &[Value]) {
        self.lock().push(notification.clone());
    }
}

/// A notification together with the sequence it applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackUpdate {
    pub notification: Notification,
    pub sequence: Vec<Value>,
}

/// Full controller state, sent to newly connected renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub sequence: Vec<Value>,
    pub original: Vec<Value>,
    pub algorithm: Option<AlgorithmKind>,
    pub speed: Speed,
    pub speed_ms: u64,
    pub stats: RunStats,
}

/// Forwards each notification over a broadcast channel.
///
/// Sending never blocks; with no subscribers the update is dropped.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: broadcast::Sender<PlaybackUpdate>,
}

impl ChannelObserver {
    pub fn new(tx: broadcast::Sender<PlaybackUpdate>) -> Self {
        Self { tx }
    }
}

impl Observer for ChannelObserver {
    fn notify(&mut self, notification: &Notification, sequence: &[Value]) {
        // Err only means nobody is listening right now.
        let _ = self.tx.send(PlaybackUpdate {
            notification: notification.clone(),
            sequence: sequence.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_clones_share_log() {
        let recorder = Recorder::new();
        let mut handle = recorder.clone();
        handle.notify(&Notification::Comparing { i: 0, j: 1 }, &[2, 1]);

        assert_eq!(recorder.len(), 1);
        assert_eq!(
            recorder.notifications(),
            vec![Notification::Comparing { i: 0, j: 1 }]
        );
    }

    #[test]
    fn channel_observer_forwards_sequence() {
        let (tx, mut rx) = broadcast::channel(4);
        let mut observer = ChannelObserver::new(tx);
        observer.notify(&Notification::Mutated { index: 1, value: 9 }, &[3, 9]);

        let update = rx.try_recv().unwrap();
        assert_eq!(update.sequence, vec![3, 9]);
        assert_eq!(
            update.notification,
            Notification::Mutated { index: 1, value: 9 }
        );
    }

    #[test]
    fn channel_observer_without_subscribers() {
        let (tx, rx) = broadcast::channel(4);
        drop(rx);
        let mut observer = ChannelObserver::new(tx);
        observer.notify(&Notification::Finalized { start: 0, end: 1 }, &[1]);
    }

    #[test]
    fn notification_serialization() {
        let json = serde_json::to_string(&Notification::Finalized { start: 2, end: 5 }).unwrap();
        assert!(json.contains("\"type\":\"finalized\""));

        let parsed: Notification = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Notification::Finalized { start: 2, end: 5 });
    }
}
