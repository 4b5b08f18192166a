#![forbid(unsafe_code)]

//! Playback controller: owns the canonical array and drives one run at a
//! time.
//!
//! # Run lifecycle
//!
//! ```text
//! Idle ──start──▶ Running ──Done──────▶ Completed ─┐
//!                    │ ──stop observed─▶ Stopped   ├─acknowledge──▶ Idle
//!                    └ ──failure───────▶ Failed  ──┘
//! ```
//!
//! # Suspension points
//!
//! [`Controller::advance`] performs exactly one step and then returns
//! [`Advance::Suspend`] with the delay to wait before the next call. The
//! cancellation token is checked at the top of every `advance`, which is
//! both "after the previous delay" and "before the next step". A step is
//! never interrupted halfway, so a stopped run leaves the array between two
//! whole steps.
//!
//! Two drivers are provided:
//!
//! - **Host-driven**: the caller owns the loop and calls `advance` whenever
//!   the delay has elapsed (used by the terminal frontend, which polls input
//!   in the meantime).
//! - **Blocking**: [`Controller::run`] sleeps on the cancellation token, so a
//!   [`ControlHandle::stop`] from another thread cuts the delay short.
//!
//! # Snapshots
//!
//! Every applied step produces a [`Snapshot`] (an owned copy of the array
//! plus highlights) delivered to the [`Presenter`] in production order.
//! Positions marked [`Role::Sorted`] stay marked in later snapshots until a
//! swap or overwrite touches them again, and a completed run ends with a snapshot marking every position sorted.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, error, info, info_span, trace};

use crate::algorithm::Algorithm;
use crate::algorithms::StepProducer;
use crate::cancel::CancelToken;
use crate::config::{self, Config};
use crate::error::{ConfigError, EngineError, EngineFailure};
use crate::generator::ArrayGenerator;
use crate::step::{Role, Step};

/// Lifecycle state of the single run slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Completed,
    Stopped,
    Failed,
}

impl RunState {
    /// Whether this is one of the end states of a run.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Stopped | Self::Failed)
    }

    /// Status line text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::Running => "Sorting...",
            Self::Completed => "Sorted",
            Self::Stopped => "Sorting stopped",
            Self::Failed => "Error occurred",
        }
    }
}

/// One highlighted position in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Highlight {
    pub index: usize,
    pub role: Role,
}

/// Render-ready state after one applied step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// 1-based position in the run's snapshot stream.
    pub seq: u64,
    /// Step that produced this snapshot; `None` for the completion snapshot.
    pub step: Option<Step>,
    pub array: Vec<u32>,
    /// Highlights for this step first, then persistent sorted marks.
    pub highlights: Vec<Highlight>,
}

impl Snapshot {
    /// Role shown at `index`, if any. Step highlights win over sorted marks.
    #[must_use]
    pub fn role_at(&self, index: usize) -> Option<Role> {
        self.highlights
            .iter()
            .find(|h| h.index == index)
            .map(|h| h.role)
    }
}

/// Receives engine output. Implemented by the presentation layer.
pub trait Presenter {
    /// Called once per applied step, in order, plus once on completion.
    fn on_snapshot(&mut self, snapshot: &Snapshot);

    /// Called on every run state transition.
    fn on_status_change(&mut self, _state: RunState) {}
}

impl Presenter for () {
    fn on_snapshot(&mut self, _snapshot: &Snapshot) {}
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    pub algorithm: Algorithm,
    pub len: usize,
    /// Applied steps, excluding the final `Done`.
    pub steps: u64,
    pub comparisons: u64,
    pub swaps: u64,
    pub overwrites: u64,
    pub highlights: u64,
}

impl RunSummary {
    fn new(algorithm: Algorithm, len: usize) -> Self {
        Self {
            algorithm,
            len,
            ..Self::default()
        }
    }

    fn record(&mut self, step: &Step) {
        self.steps += 1;
        match step {
            Step::Compare(..) => self.comparisons += 1,
            Step::Swap(..) => self.swaps += 1,
            Step::Overwrite(..) => self.overwrites += 1,
            Step::Highlight(..) => self.highlights += 1,
            Step::Done => {}
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunOutcome {
    pub state: RunState,
    pub summary: RunSummary,
}

/// Result of one [`Controller::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// A step was applied; wait this long before advancing again.
    Suspend(Duration),
    /// The run reached a terminal state.
    Finished(RunOutcome),
    /// No run is active.
    Idle,
}

/// Thread-safe remote for the controller: stop and delay changes.
#[derive(Debug, Clone)]
pub struct ControlHandle {
    token: CancelToken,
    delay_ms: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
}

impl ControlHandle {
    /// Request the active run to stop at its next suspension point.
    ///
    /// No-op when nothing is running.
    pub fn stop(&self) {
        if self.running.load(Ordering::SeqCst) {
            debug!("stop requested");
            self.token.request();
            // The run may have finished between the check and the request.
            if !self.running.load(Ordering::SeqCst) {
                self.token.reset();
            }
        } else {
            debug!("stop ignored: no active run");
        }
    }

    /// Change the per-step delay. Takes effect at the next suspension point.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DelayOutOfRange`].
    pub fn set_delay(&self, delay_ms: u64) -> Result<(), ConfigError> {
        let delay_ms = config::validate_delay(delay_ms)?;
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
        debug!(delay_ms, "delay updated");
        Ok(())
    }

    /// Current per-step delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.load(Ordering::SeqCst))
    }

    /// Whether a run is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

struct ActiveRun {
    algorithm: Algorithm,
    producer: Box<dyn StepProducer>,
    sorted: Vec<bool>,
    summary: RunSummary,
    seq: u64,
}

/// Owner of the canonical array and the single run slot.
pub struct Controller {
    algorithm: Algorithm,
    size: usize,
    array: Vec<u32>,
    state: RunState,
    generator: ArrayGenerator,
    handle: ControlHandle,
    run: Option<ActiveRun>,
    last_outcome: Option<RunOutcome>,
}

impl Controller {
    /// Controller with an entropy-seeded generator and a freshly generated
    /// array.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_generator(config, ArrayGenerator::new())
    }

    /// Controller drawing arrays from `generator`.
    #[must_use]
    pub fn with_generator(config: Config, mut generator: ArrayGenerator) -> Self {
        let array = generator.generate(config.size());
        Self {
            algorithm: config.algorithm(),
            size: config.size(),
            array,
            state: RunState::Idle,
            generator,
            handle: ControlHandle {
                token: CancelToken::new(),
                delay_ms: Arc::new(AtomicU64::new(config.delay_ms())),
                running: Arc::new(AtomicBool::new(false)),
            },
            run: None,
            last_outcome: None,
        }
    }

    /// Current run state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Read-only view of the canonical array.
    #[inline]
    #[must_use]
    pub fn array(&self) -> &[u32] {
        &self.array
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> Config {
        Config::from_parts(
            self.algorithm,
            self.size,
            self.handle.delay_ms.load(Ordering::SeqCst),
        )
    }

    /// Current per-step delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.handle.delay()
    }

    /// Remote handle sharing this controller's token and delay.
    #[must_use]
    pub fn handle(&self) -> ControlHandle {
        self.handle.clone()
    }

    /// Outcome of the most recent run, if any.
    #[must_use]
    pub fn last_outcome(&self) -> Option<&RunOutcome> {
        self.last_outcome.as_ref()
    }

    /// Replace the array with `size` fresh random values.
    ///
    /// Returns `Ok(false)` without touching anything while a run is active.
    ///
    /// # Errors
    ///
    /// [`ConfigError::SizeOutOfRange`].
    pub fn regenerate(&mut self, size: usize) -> Result<bool, ConfigError> {
        let size = config::validate_size(size)?;
        if self.state == RunState::Running {
            debug!(size, "regenerate ignored while running");
            return Ok(false);
        }
        self.size = size;
        self.array = self.generator.generate(size);
        debug!(size, "array regenerated");
        Ok(true)
    }

    /// Replace the array with explicit values. Ignored while running.
    ///
    /// Unlike [`regenerate`](Self::regenerate) this accepts any length,
    /// including the degenerate 0 and 1.
    pub fn load(&mut self, values: Vec<u32>) -> bool {
        if self.state == RunState::Running {
            debug!(len = values.len(), "load ignored while running");
            return false;
        }
        self.array = values;
        true
    }

    /// Select the algorithm for the next run. Ignored while running.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> bool {
        if self.state == RunState::Running {
            debug!(%algorithm, "algorithm change ignored while running");
            return false;
        }
        self.algorithm = algorithm;
        true
    }

    /// Change the per-step delay, effective at the next suspension point.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DelayOutOfRange`].
    pub fn set_delay(&self, delay_ms: u64) -> Result<(), ConfigError> {
        self.handle.set_delay(delay_ms)
    }

    /// Request the active run to stop. No-op when nothing is running.
    pub fn stop(&self) {
        self.handle.stop();
    }

    /// Return a terminal state to `Idle`.
    pub fn acknowledge(&mut self, presenter: &mut dyn Presenter) {
        if self.state.is_terminal() {
            self.state = RunState::Idle;
            presenter.on_status_change(RunState::Idle);
        }
    }

    /// Begin a run of the selected algorithm over the current array.
    ///
    /// # Errors
    ///
    /// [`EngineError::AlreadyRunning`] if a run is active; the active run is
    /// left untouched.
    pub fn start(&mut self, presenter: &mut dyn Presenter) -> Result<(), EngineError> {
        let producer = self.algorithm.producer(self.array.len());
        self.start_with(self.algorithm, producer, presenter)
    }

    /// Begin a run driven by a custom producer over the current array.
    ///
    /// `algorithm` labels the run in logs, summaries, and failures.
    ///
    /// # Errors
    ///
    /// [`EngineError::AlreadyRunning`] if a run is active.
    pub fn start_with(
        &mut self,
        algorithm: Algorithm,
        producer: Box<dyn StepProducer>,
        presenter: &mut dyn Presenter,
    ) -> Result<(), EngineError> {
        if self.state == RunState::Running {
            debug!(%algorithm, "start ignored: run already active");
            return Err(EngineError::AlreadyRunning);
        }

        self.handle.token.reset();
        let len = self.array.len();
        self.run = Some(ActiveRun {
            algorithm,
            producer,
            sorted: vec![false; len],
            summary: RunSummary::new(algorithm, len),
            seq: 0,
        });
        self.state = RunState::Running;
        self.handle.running.store(true, Ordering::SeqCst);
        info!(
            %algorithm,
            len,
            delay_ms = self.handle.delay_ms.load(Ordering::SeqCst),
            "sort run started"
        );
        presenter.on_status_change(RunState::Running);
        Ok(())
    }

    /// Perform one step of the active run.
    ///
    /// # Errors
    ///
    /// [`EngineError::Failure`] if the step could not be produced or applied.
    /// The run is then `Failed` and the slot is free again.
    pub fn advance(&mut self, presenter: &mut dyn Presenter) -> Result<Advance, EngineError> {
        if self.run.is_none() {
            return Ok(Advance::Idle);
        }
        if self.handle.token.is_requested() {
            return Ok(Advance::Finished(self.finish(RunState::Stopped, presenter)));
        }

        let stepped = match self.run.as_mut() {
            Some(run) => step_run(run, &mut self.array),
            None => return Ok(Advance::Idle),
        };

        match stepped {
            Ok(Some(snapshot)) => {
                trace!(seq = snapshot.seq, step = ?snapshot.step, "step applied");
                presenter.on_snapshot(&snapshot);
                Ok(Advance::Suspend(self.delay()))
            }
            Ok(None) => Ok(Advance::Finished(
                self.finish(RunState::Completed, presenter),
            )),
            Err(failure) => Err(self.fail(failure, presenter)),
        }
    }

    /// Start a run and block until it reaches a terminal state.
    ///
    /// Delays are slept on the cancellation token, so a stop issued through
    /// a [`ControlHandle`] wakes the loop immediately.
    ///
    /// # Errors
    ///
    /// [`EngineError::AlreadyRunning`] or [`EngineError::Failure`].
    pub fn run(&mut self, presenter: &mut dyn Presenter) -> Result<RunOutcome, EngineError> {
        self.start(presenter)?;
        let span = info_span!("sort_run", algorithm = %self.algorithm, len = self.array.len());
        let _guard = span.enter();

        loop {
            match self.advance(presenter)? {
                Advance::Suspend(delay) => {
                    // A stop request wakes the wait; the next advance observes it.
                    self.handle.token.wait_timeout(delay);
                }
                Advance::Finished(outcome) => return Ok(outcome),
                Advance::Idle => return Ok(self.last_outcome.unwrap_or_default()),
            }
        }
    }

    fn finish(&mut self, state: RunState, presenter: &mut dyn Presenter) -> RunOutcome {
        let (summary, seq) = self
            .run
            .take()
            .map(|run| (run.summary, run.seq))
            .unwrap_or_default();

        if state == RunState::Completed {
            let snapshot = Snapshot {
                seq: seq + 1,
                step: None,
                array: self.array.clone(),
                highlights: (0..self.array.len())
                    .map(|index| Highlight {
                        index,
                        role: Role::Sorted,
                    })
                    .collect(),
            };
            presenter.on_snapshot(&snapshot);
        }

        self.release(state);
        info!(
            algorithm = %summary.algorithm,
            state = ?state,
            steps = summary.steps,
            comparisons = summary.comparisons,
            swaps = summary.swaps,
            overwrites = summary.overwrites,
            "sort run finished"
        );
        presenter.on_status_change(state);

        let outcome = RunOutcome { state, summary };
        self.last_outcome = Some(outcome);
        outcome
    }

    fn fail(&mut self, failure: EngineFailure, presenter: &mut dyn Presenter) -> EngineError {
        let summary = self.run.take().map(|run| run.summary).unwrap_or_default();
        self.release(RunState::Failed);
        error!(error = %failure, steps = summary.steps, "sort run failed");
        presenter.on_status_change(RunState::Failed);
        self.last_outcome = Some(RunOutcome {
            state: RunState::Failed,
            summary,
        });
        EngineError::Failure(failure)
    }

    fn release(&mut self, state: RunState) {
        self.state = state;
        self.handle.running.store(false, Ordering::SeqCst);
        self.handle.token.reset();
    }
}

/// Produce and apply one step. `Ok(None)` means the producer is exhausted.
fn step_run(run: &mut ActiveRun, array: &mut [u32]) -> Result<Option<Snapshot>, EngineFailure> {
    let view: &[u32] = array;
    let producer = &mut run.producer;
    let step = catch_unwind(AssertUnwindSafe(|| producer.next_step(view))).map_err(|payload| {
        EngineFailure::ProducerPanicked {
            algorithm: run.algorithm.key(),
            message: panic_message(payload.as_ref()),
        }
    })?;

    if step == Step::Done {
        return Ok(None);
    }
    step.apply(array)?;
    run.summary.record(&step);
    run.seq += 1;

    let mut highlights: Vec<Highlight> = Vec::new();
    match &step {
        Step::Compare(i, j) => {
            for index in [*i, *j] {
                highlights.push(Highlight {
                    index,
                    role: Role::Active,
                });
            }
        }
        Step::Swap(i, j) => {
            for index in [*i, *j] {
                run.sorted[index] = false;
                highlights.push(Highlight {
                    index,
                    role: Role::Active,
                });
            }
        }
        Step::Overwrite(index, _) => {
            // A written slot is no longer known to be final.
            run.sorted[*index] = false;
            highlights.push(Highlight {
                index: *index,
                role: Role::Active,
            });
        }
        Step::Highlight(indices, role) => {
            for &index in indices {
                if *role == Role::Sorted {
                    run.sorted[index] = true;
                }
                highlights.push(Highlight { index, role: *role });
            }
        }
        Step::Done => {}
    }
    for (index, _) in run.sorted.iter().enumerate().filter(|(_, s)| **s) {
        if !highlights.iter().any(|h| h.index == index) {
            highlights.push(Highlight {
                index,
                role: Role::Sorted,
            });
        }
    }

    Ok(Some(Snapshot {
        seq: run.seq,
        step: Some(step),
        array: array.to_vec(),
        highlights,
    }))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
