//! Async redraw-tick loop for a [`ColorScheduler`].
//!
//! The service owns the scheduler inside a single tokio task. That task is the
//! only writer of the active color; any number of readers follow it through a
//! [`watch`] channel of [`Snapshot`]s.

use crate::color::HexColor;
use crate::command::SchedulerAction;
use crate::pattern::Pattern;
use crate::scheduler::{ColorScheduler, SchedulerState, TickOutcome};
use crate::time::TimeSource;
use std::fmt;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, trace};

const COMMAND_CAPACITY: usize = 32;

/// What readers see of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Color currently shown.
    pub color: HexColor,
    /// Scheduler state.
    pub state: SchedulerState,
    /// Last play flag supplied.
    pub playing: bool,
    /// Index of the active step while running.
    pub step_index: Option<usize>,
    /// Number of steps in the pattern.
    pub step_count: usize,
}

impl Snapshot {
    fn capture<T: TimeSource, const N: usize>(scheduler: &ColorScheduler<T, N>) -> Self {
        let step_index = if scheduler.is_running() {
            scheduler.position().map(|position| position.index)
        } else {
            None
        };

        Self {
            color: scheduler.current_color(),
            state: scheduler.state(),
            playing: scheduler.is_playing(),
            step_index,
            step_count: scheduler.pattern().len(),
        }
    }
}

/// Errors returned by [`SchedulerHandle`].
#[derive(Debug)]
pub enum ServiceError {
    /// The service loop is no longer running.
    Closed,
    /// The service task panicked or was cancelled.
    Join(JoinError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Closed => write!(f, "scheduler service is closed"),
            ServiceError::Join(err) => write!(f, "scheduler service task failed: {}", err),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Closed => None,
            ServiceError::Join(err) => Some(err),
        }
    }
}

/// Spawns scheduler loops.
pub struct SchedulerService;

impl SchedulerService {
    /// Moves `scheduler` into a new tokio task that ticks every `frame_interval`
    /// while the scheduler is running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<T, const N: usize>(
        scheduler: ColorScheduler<T, N>,
        frame_interval: Duration,
    ) -> SchedulerHandle<N>
    where
        T: TimeSource + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::capture(&scheduler));

        let task = tokio::spawn(run_loop(scheduler, frame_interval, command_rx, snapshot_tx));

        SchedulerHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            task,
        }
    }
}

async fn run_loop<T: TimeSource, const N: usize>(
    mut scheduler: ColorScheduler<T, N>,
    frame_interval: Duration,
    mut commands: mpsc::Receiver<SchedulerAction<N>>,
    snapshots: watch::Sender<Snapshot>,
) {
    let mut ticker = time::interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        frame_ms = frame_interval.as_millis() as u64,
        steps = scheduler.pattern().len(),
        "scheduler service started"
    );

    loop {
        tokio::select! {
            biased;
            command = commands.recv() => {
                let Some(action) = command else { break };
                if let SchedulerAction::Load(pattern) = &action {
                    info!(
                        steps = pattern.len(),
                        cycle_ms = pattern.cycle_millis(),
                        "pattern loaded"
                    );
                }

                let before = scheduler.state();
                let after = scheduler.handle_action(action);
                if before != after {
                    debug!(from = ?before, to = ?after, "scheduler state changed");
                    if after == SchedulerState::Running {
                        ticker.reset_immediately();
                    }
                }
            }
            // Gated on Running: while idle no tick is pending at all.
            _ = ticker.tick(), if scheduler.is_running() => {
                if let TickOutcome::Changed(color) = scheduler.tick() {
                    trace!(%color, "color changed");
                }
            }
        }

        let next = Snapshot::capture(&scheduler);
        snapshots.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    info!("scheduler service stopped");
}

/// Control handle for a spawned scheduler loop.
///
/// Dropping the handle stops the loop once queued commands are drained.
pub struct SchedulerHandle<const N: usize> {
    commands: mpsc::Sender<SchedulerAction<N>>,
    snapshots: watch::Receiver<Snapshot>,
    task: JoinHandle<()>,
}

impl<const N: usize> SchedulerHandle<N> {
    /// Sends an action to the loop.
    pub async fn send(&self, action: SchedulerAction<N>) -> Result<(), ServiceError> {
        self.commands
            .send(action)
            .await
            .map_err(|_| ServiceError::Closed)
    }

    /// Replaces the pattern.
    pub async fn load(&self, pattern: Pattern<N>) -> Result<(), ServiceError> {
        self.send(SchedulerAction::Load(pattern)).await
    }

    pub async fn play(&self) -> Result<(), ServiceError> {
        self.send(SchedulerAction::Play).await
    }

    pub async fn pause(&self) -> Result<(), ServiceError> {
        self.send(SchedulerAction::Pause).await
    }

    pub async fn toggle(&self) -> Result<(), ServiceError> {
        self.send(SchedulerAction::Toggle).await
    }

    /// Shows the first step's color without pausing.
    pub async fn reset(&self) -> Result<(), ServiceError> {
        self.send(SchedulerAction::Reset).await
    }

    /// Pauses and shows the first step's color.
    pub async fn stop(&self) -> Result<(), ServiceError> {
        self.send(SchedulerAction::Stop).await
    }

    /// Returns the latest published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        *self.snapshots.borrow()
    }

    /// Returns a receiver notified on every published change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Stops the loop and waits for it to finish.
    pub async fn shutdown(self) -> Result<(), ServiceError> {
        let SchedulerHandle { commands, task, .. } = self;
        drop(commands);
        task.await.map_err(ServiceError::Join)
    }
}
