//! Playback controller for instrumented sort traces.
//!
//! The controller owns the working sequence and the run statistics. A run
//! is a tokio task that draws events from a kernel trace one at a time,
//! applies each to the working sequence, notifies the observer, and then
//! sleeps for the current speed's delay.
//!
//! # Suspension points
//!
//! The task yields in exactly two places, and both watch the run status
//! and the session generation:
//!
//! - before drawing each event, where a paused run waits for a status
//!   change (bounded by `pause_poll_interval`)
//! - during the per-event delay, which ends early on cancellation or when
//!   a newer run or sequence change takes over the session
//!
//! `pause`, `resume` and `cancel` only flip the status, so they are safe to
//! call from any task or thread. Events are never reordered, batched or
//! applied after the task has observed a cancellation.

use std::sync::Arc;
use std::time::Duration;

use sortvis_kernels::{AlgorithmKind, Event, Trace, Value};
use tokio::sync::{watch, RwLock, RwLockWriteGuard};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace};

use crate::config::PlaybackConfig;
use crate::error::{Error, Result};
use crate::observer::{Notification, Observer, PlaybackSnapshot};
use crate::speed::Speed;
use crate::stats::{RunState, RunStats, RunStatus};

/// Paces, pauses and cancels the application of a kernel trace.
///
/// Cloning yields another handle to the same controller.
#[derive(Debug, Clone)]
pub struct Controller {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    config: PlaybackConfig,
    status: watch::Sender<RunStatus>,
    speed: watch::Sender<Speed>,
    /// Bumped, under the session write lock, by every start and every
    /// sequence change. A run task whose generation no longer matches has
    /// been superseded and must stop.
    generation: watch::Sender<u64>,
    session: RwLock<Session>,
}

/// Everything a run reads or writes besides its status.
#[derive(Debug, Default)]
struct Session {
    original: Vec<Value>,
    working: Vec<Value>,
    algorithm: Option<AlgorithmKind>,
    run: RunState,
}

/// What one run has applied so far, kept by its task so the run can still
/// report itself after the session has moved on.
#[derive(Debug)]
struct Progress {
    run: RunState,
    sequence: Vec<Value>,
}

/// Handle to a spawned run.
#[derive(Debug)]
pub struct RunHandle {
    task: JoinHandle<RunStats>,
}

impl RunHandle {
    /// Wait for the run to finish or observe its cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Join`] if the playback task panicked or was aborted.
    pub async fn join(self) -> Result<RunStats> {
        Ok(self.task.await?)
    }

    /// Whether the playback task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

impl Controller {
    /// Create an idle controller with an empty sequence.
    pub fn new(config: PlaybackConfig) -> Self {
        Self::from_session(config, Session::default())
    }

    /// Create an idle controller with `sequence` loaded.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the sequence is longer than `config.max_len`.
    pub fn with_sequence(config: PlaybackConfig, sequence: Vec<Value>) -> Result<Self> {
        validate_len(&sequence, config.max_len)?;
        let session = Session {
            original: sequence.clone(),
            working: sequence,
            ..Session::default()
        };
        Ok(Self::from_session(config, session))
    }

    fn from_session(config: PlaybackConfig, session: Session) -> Self {
        let (status, _) = watch::channel(RunStatus::Idle);
        let (speed, _) = watch::channel(config.speed);
        let (generation, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                config,
                status,
                speed,
                generation,
                session: RwLock::new(session),
            }),
        }
    }

    /// The controller's configuration.
    pub fn config(&self) -> &PlaybackConfig {
        &self.shared.config
    }

    /// Current run status.
    pub fn status(&self) -> RunStatus {
        *self.shared.status.borrow()
    }

    /// Receiver that observes every status transition.
    pub fn subscribe_status(&self) -> watch::Receiver<RunStatus> {
        self.shared.status.subscribe()
    }

    /// Current per-event speed.
    pub fn speed(&self) -> Speed {
        *self.shared.speed.borrow()
    }

    /// Change the per-event delay. Applies from the next delay onward,
    /// whatever the current status.
    pub fn set_speed(&self, speed: Speed) {
        let previous = self.shared.speed.send_replace(speed);
        if previous != speed {
            debug!(from_ms = previous.millis(), to_ms = speed.millis(), "speed changed");
        }
    }

    /// Working sequence as of now.
    pub async fn sequence(&self) -> Vec<Value> {
        self.shared.session.read().await.working.clone()
    }

    /// Sequence restored by [`Controller::reset`].
    pub async fn original(&self) -> Vec<Value> {
        self.shared.session.read().await.original.clone()
    }

    /// Statistics of the current or most recent run.
    pub async fn stats(&self) -> RunStats {
        let session = self.shared.session.read().await;
        session.run.stats(self.status())
    }

    /// Everything a renderer needs to draw the current state.
    pub async fn snapshot(&self) -> PlaybackSnapshot {
        let session = self.shared.session.read().await;
        let speed = self.speed();
        PlaybackSnapshot {
            sequence: session.working.clone(),
            original: session.original.clone(),
            algorithm: session.algorithm,
            speed,
            speed_ms: speed.millis(),
            stats: session.run.stats(self.status()),
        }
    }

    /// Replace both the original and the working sequence.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the sequence is too long,
    /// [`Error::AlreadyRunning`] while a run is active.
    pub async fn load(&self, sequence: Vec<Value>) -> Result<()> {
        self.validate(&sequence)?;
        let mut session = self.idle_session().await?;
        debug!(len = sequence.len(), "sequence loaded");
        session.original.clone_from(&sequence);
        session.working = sequence;
        Ok(())
    }

    /// Restore the working sequence from the original and clear statistics.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyRunning`] while a run is active.
    pub async fn reset(&self) -> Result<()> {
        let mut session = self.idle_session().await?;
        session.working = session.original.clone();
        debug!("sequence reset");
        Ok(())
    }

    /// Replace only the working sequence, keeping the original for
    /// [`Controller::reset`]. Used for shuffling.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the sequence is too long,
    /// [`Error::AlreadyRunning`] while a run is active.
    pub async fn replace_working(&self, sequence: Vec<Value>) -> Result<()> {
        self.validate(&sequence)?;
        let mut session = self.idle_session().await?;
        session.working = sequence;
        Ok(())
    }

    /// Load `sequence` and start sorting it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the sequence is too long,
    /// [`Error::AlreadyRunning`] while a run is active.
    pub async fn start<O>(
        &self,
        sequence: Vec<Value>,
        algorithm: AlgorithmKind,
        speed: Speed,
        observer: O,
    ) -> Result<RunHandle>
    where
        O: Observer + 'static,
    {
        self.validate(&sequence)?;
        self.begin(Some(sequence), algorithm, speed, observer).await
    }

    /// Start sorting the current working sequence.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyRunning`] while a run is active.
    pub async fn start_current<O>(
        &self,
        algorithm: AlgorithmKind,
        speed: Speed,
        observer: O,
    ) -> Result<RunHandle>
    where
        O: Observer + 'static,
    {
        self.begin(None, algorithm, speed, observer).await
    }

    /// Start a run and wait for it to end.
    ///
    /// # Errors
    ///
    /// Any error from [`Controller::start`] or [`RunHandle::join`].
    pub async fn run<O>(
        &self,
        sequence: Vec<Value>,
        algorithm: AlgorithmKind,
        speed: Speed,
        observer: O,
    ) -> Result<RunStats>
    where
        O: Observer + 'static,
    {
        self.start(sequence, algorithm, speed, observer)
            .await?
            .join()
            .await
    }

    /// Suspend a running run. Pausing a paused run does nothing.
    ///
    /// # Errors
    ///
    /// [`Error::NotRunning`] unless the run is running or paused.
    pub fn pause(&self) -> Result<()> {
        self.transition(|_| RunStatus::Paused)?;
        debug!("run paused");
        Ok(())
    }

    /// Continue a paused run. Resuming a running run does nothing.
    ///
    /// # Errors
    ///
    /// [`Error::NotRunning`] unless the run is running or paused.
    pub fn resume(&self) -> Result<()> {
        self.transition(|_| RunStatus::Running)?;
        debug!("run resumed");
        Ok(())
    }

    /// Pause a running run or resume a paused one. Returns the new status.
    ///
    /// # Errors
    ///
    /// [`Error::NotRunning`] unless the run is running or paused.
    pub fn toggle_pause(&self) -> Result<RunStatus> {
        let status = self.transition(|status| match status {
            RunStatus::Paused => RunStatus::Running,
            _ => RunStatus::Paused,
        })?;
        debug!(?status, "pause toggled");
        Ok(status)
    }

    /// Stop the run at its next suspension point. Mutations already applied
    /// stay in the working sequence.
    ///
    /// # Errors
    ///
    /// [`Error::NotRunning`] unless the run is running or paused.
    pub fn cancel(&self) -> Result<()> {
        self.transition(|_| RunStatus::Cancelled)?;
        info!("run cancelled");
        Ok(())
    }

    fn transition(&self, next: impl FnOnce(RunStatus) -> RunStatus) -> Result<RunStatus> {
        let mut result = Err(Error::NotRunning);
        self.shared.status.send_if_modified(|status| {
            if !status.is_active() {
                return false;
            }
            let target = next(*status);
            result = Ok(target);
            let changed = target != *status;
            *status = target;
            changed
        });
        result
    }

    fn validate(&self, sequence: &[Value]) -> Result<()> {
        validate_len(sequence, self.shared.config.max_len)
    }

    /// Lock the session for a sequence change and return it with fresh
    /// statistics and an Idle status.
    async fn idle_session(&self) -> Result<RwLockWriteGuard<'_, Session>> {
        let mut session = self.shared.session.write().await;
        if self.status().is_active() {
            return Err(Error::AlreadyRunning);
        }
        self.shared.generation.send_modify(|g| *g += 1);
        session.run = RunState::default();
        session.algorithm = None;
        self.shared.status.send_replace(RunStatus::Idle);
        Ok(session)
    }

    async fn begin<O>(
        &self,
        sequence: Option<Vec<Value>>,
        algorithm: AlgorithmKind,
        speed: Speed,
        observer: O,
    ) -> Result<RunHandle>
    where
        O: Observer + 'static,
    {
        let mut session = self.shared.session.write().await;

        // Claiming the status under the session lock keeps sequence
        // changes and concurrent starts out.
        let claimed = self.shared.status.send_if_modified(|status| {
            if status.is_active() {
                return false;
            }
            *status = RunStatus::Running;
            true
        });
        if !claimed {
            return Err(Error::AlreadyRunning);
        }

        if let Some(sequence) = sequence {
            session.original.clone_from(&sequence);
            session.working = sequence;
        }

        let trace = match algorithm.trace(&session.working) {
            Ok(trace) => trace,
            Err(err) => {
                self.shared.status.send_replace(RunStatus::Idle);
                return Err(err.into());
            }
        };

        self.shared.speed.send_replace(speed);
        self.shared.generation.send_modify(|g| *g += 1);
        session.algorithm = Some(algorithm);
        session.run = RunState::started(Instant::now());

        info!(
            algorithm = algorithm.id(),
            len = session.working.len(),
            events = trace.len(),
            speed_ms = speed.millis(),
            "run started"
        );

        let generation = *self.shared.generation.borrow();
        let progress = Progress {
            run: session.run.clone(),
            sequence: session.working.clone(),
        };
        drop(session);

        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(drive(shared, generation, trace, observer, progress));
        Ok(RunHandle { task })
    }
}

fn validate_len(sequence: &[Value], max_len: usize) -> Result<()> {
    if sequence.len() > max_len {
        return Err(Error::InvalidInput(format!(
            "sequence length {} exceeds limit {max_len}",
            sequence.len()
        )));
    }
    Ok(())
}

/// The run task: draw, apply, notify, wait; until the trace is exhausted
/// or the run stops being active.
async fn drive<O: Observer>(
    shared: Arc<Shared>,
    generation: u64,
    trace: Trace,
    mut observer: O,
    mut progress: Progress,
) -> RunStats {
    let mut view = RunWatch {
        status: shared.status.subscribe(),
        generation: shared.generation.subscribe(),
        own: generation,
    };
    let poll = shared.config.pause_poll_interval;
    let mut events = trace.into_iter();

    let outcome = loop {
        if !view.wait_while_paused(poll).await {
            break RunStatus::Cancelled;
        }

        let Some(event) = events.next() else {
            break RunStatus::Finished;
        };

        {
            let mut session = shared.session.write().await;
            let status = *view.status.borrow();
            if !view.is_current() || !status.is_active() {
                break RunStatus::Cancelled;
            }
            session.apply(event, status, &mut observer);
            progress.run.clone_from(&session.run);
            event.apply(&mut progress.sequence);
        }

        let delay = shared.speed.borrow().delay();
        if !view.pace(delay).await {
            break RunStatus::Cancelled;
        }
    };

    finish(&shared, generation, outcome, &mut observer, progress).await
}

/// A run task's view of the controller: its status and whether it still
/// owns the session.
struct RunWatch {
    status: watch::Receiver<RunStatus>,
    generation: watch::Receiver<u64>,
    own: u64,
}

impl RunWatch {
    fn is_current(&self) -> bool {
        *self.generation.borrow() == self.own
    }

    fn is_live(&self) -> bool {
        self.is_current() && self.status.borrow().is_active()
    }

    /// Block while paused. Returns `false` once the run is no longer active
    /// or has been superseded.
    async fn wait_while_paused(&mut self, poll: Duration) -> bool {
        loop {
            if !self.is_current() {
                return false;
            }
            let status = *self.status.borrow_and_update();
            match status {
                RunStatus::Running => return true,
                RunStatus::Paused => {
                    // Wake on the next transition, or re-check after `poll`.
                    let Self {
                        status, generation, ..
                    } = &mut *self;
                    let _ = tokio::time::timeout(poll, async {
                        tokio::select! {
                            _ = status.changed() => {}
                            _ = generation.changed() => {}
                        }
                    })
                    .await;
                }
                _ => return false,
            }
        }
    }

    /// Sleep for `delay`, returning early with `false` if the run stops being
    /// active or is superseded. Pausing does not shorten the delay.
    async fn pace(&mut self, delay: Duration) -> bool {
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);

        loop {
            let Self {
                status, generation, ..
            } = &mut *self;
            let changed = tokio::select! {
                () = &mut sleep => None,
                changed = status.changed() => Some(changed),
                changed = generation.changed() => Some(changed),
            };
            match changed {
                None => return self.is_live(),
                Some(Ok(())) if self.is_live() => {}
                Some(_) => return false,
            }
        }
    }
}

async fn finish<O: Observer>(
    shared: &Shared,
    generation: u64,
    outcome: RunStatus,
    observer: &mut O,
    mut progress: Progress,
) -> RunStats {
    let mut session = shared.session.write().await;

    if *shared.generation.borrow() != generation {
        // A newer start or sequence change owns the session now. Sessions
        // only move on after this run was cancelled, so report that with
        // what this run itself applied.
        debug!(generation, "superseded run exited");
        progress.run.freeze(Instant::now());
        let stats = progress.run.stats(RunStatus::Cancelled);
        observer.notify(&Notification::Completed(stats.clone()), &progress.sequence);
        return stats;
    }

    session.run.freeze(Instant::now());
    shared.status.send_if_modified(|status| {
        if !status.is_active() {
            return false;
        }
        *status = outcome;
        true
    });

    let status = *shared.status.borrow();
    let stats = session.run.stats(status);
    info!(
        ?status,
        comparisons = stats.comparisons,
        mutations = stats.mutations,
        elapsed = %stats.elapsed,
        "run complete"
    );
    observer.notify(&Notification::Completed(stats.clone()), &session.working);
    stats
}

impl Session {
    /// Apply one event and report it. Counters move only here.
    fn apply<O: Observer>(&mut self, event: Event, status: RunStatus, observer: &mut O) {
        trace!(?event, "applying event");
        match event {
            Event::Compare { i, j } => {
                self.run.comparisons += 1;
                observer.notify(&Notification::Comparing { i, j }, &self.working);
            }
            Event::Swap { i, j } => {
                self.working.swap(i, j);
                self.run.mutations += 1;
                for index in [i, j] {
                    let value = self.working[index];
                    observer.notify(&Notification::Mutated { index, value }, &self.working);
                }
            }
            Event::Assign { index, value } => {
                self.working[index] = value;
                self.run.mutations += 1;
                observer.notify(&Notification::Mutated { index, value }, &self.working);
            }
            Event::Finalize { .. } | Event::FinalizeRange { .. } => {
                if let Some(range) = event.finalized() {
                    observer.notify(
                        &Notification::Finalized {
                            start: range.start,
                            end: range.end,
                        },
                        &self.working,
                    );
                }
                return;
            }
        }
        observer.notify(&Notification::Stats(self.run.stats(status)), &self.working);
    }
}
