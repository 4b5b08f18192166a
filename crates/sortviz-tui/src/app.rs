#![forbid(unsafe_code)]

//! Interactive application state and the terminal event loop.
//!
//! The controller is driven cooperatively on one thread: the loop polls
//! for input with a timeout equal to the time left until the next step is
//! due, then calls [`App::tick`], which advances the run at most once.
//! A stop request is observed on the very next tick rather than after the
//! remaining delay.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use sortviz_core::{
    Advance, Algorithm, ArrayGenerator, Controller, DELAY_RANGE_MS, EngineError, EngineFailure,
    Presenter, Role, RunState, RunSummary, SIZE_RANGE, Snapshot, SnapshotRecorder,
};
use tracing::{debug, error, info, warn};

use crate::cli::Opts;
use crate::session::{SessionOptions, TerminalSession};
use crate::view::{self, ViewModel};

/// Poll timeout while no run is active.
pub const IDLE_POLL: Duration = Duration::from_millis(250);

/// Size change per `[` / `]` press.
pub const SIZE_STEP: usize = 5;

/// Status text while a stop has been requested but not yet observed.
pub const STOPPING_LABEL: &str = "Stopping...";

/// Presenter behind the controller: keeps what the next frame needs and
/// forwards everything to the optional recorder.
struct Screen {
    snapshot: Option<Snapshot>,
    state: RunState,
    summary: Option<RunSummary>,
    error: Option<String>,
    recorder: Option<SnapshotRecorder<BufWriter<File>>>,
    dirty: bool,
}

impl Presenter for Screen {
    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.on_snapshot(snapshot);
        }
        self.snapshot = Some(snapshot.clone());
        self.dirty = true;
    }

    fn on_status_change(&mut self, state: RunState) {
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.on_status_change(state);
        }
        self.state = state;
        self.dirty = true;
    }
}

impl Screen {
    fn clear_run(&mut self) {
        self.snapshot = None;
        self.summary = None;
        self.error = None;
    }
}

/// Application model: controller plus UI state.
pub struct App {
    controller: Controller,
    screen: Screen,
    help: bool,
    stopping: bool,
    next_step_at: Option<Instant>,
    should_quit: bool,
    terminal_reset: bool,
}

impl App {
    #[must_use]
    pub fn new(controller: Controller) -> Self {
        let state = controller.state();
        Self {
            controller,
            screen: Screen {
                snapshot: None,
                state,
                summary: None,
                error: None,
                recorder: None,
                dirty: true,
            },
            help: false,
            stopping: false,
            next_step_at: None,
            should_quit: false,
            terminal_reset: false,
        }
    }

    /// Mirror every snapshot and status change into `recorder`.
    #[must_use]
    pub fn with_recorder(mut self, recorder: SnapshotRecorder<BufWriter<File>>) -> Self {
        self.screen.recorder = Some(recorder);
        self
    }

    #[must_use]
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.screen.state
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn help_visible(&self) -> bool {
        self.help
    }

    /// Status line text.
    #[must_use]
    pub fn status_text(&self) -> &'static str {
        if self.stopping && self.screen.state == RunState::Running {
            STOPPING_LABEL
        } else {
            self.screen.state.label()
        }
    }

    /// Summary of the last finished run, if it has not been cleared.
    #[must_use]
    pub fn summary(&self) -> Option<RunSummary> {
        self.screen.summary
    }

    /// Error message of the last failed action, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.screen.error.as_deref()
    }

    /// Whether a redraw is pending; clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.screen.dirty)
    }

    pub fn mark_dirty(&mut self) {
        self.screen.dirty = true;
    }

    /// How long the event loop may block waiting for input.
    #[must_use]
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.next_step_at
            .map_or(IDLE_POLL, |due| due.saturating_duration_since(now))
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Esc if self.help => self.help = false,
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char('?') => self.help = !self.help,
            KeyCode::Char(' ') => self.toggle_run(now),
            KeyCode::Char('r') => {
                let size = self.controller.config().size();
                self.regenerate(size);
            }
            KeyCode::Char('[') => self.resize(false),
            KeyCode::Char(']') => self.resize(true),
            KeyCode::Char('-') => self.adjust_delay(true),
            KeyCode::Char('+' | '=') => self.adjust_delay(false),
            KeyCode::Char(c @ '1'..='6') => {
                let algorithm = Algorithm::ALL[c as usize - '1' as usize];
                if self.controller.set_algorithm(algorithm) {
                    debug!(%algorithm, "algorithm selected");
                }
            }
            _ => return,
        }
        self.screen.dirty = true;
    }

    /// Whether the terminal modes need switching back on. Clears the flag.
    pub fn take_terminal_reset(&mut self) -> bool {
        std::mem::take(&mut self.terminal_reset)
    }

    /// Advance the run if the next step is due.
    pub fn tick(&mut self, now: Instant) {
        let Some(due) = self.next_step_at else {
            return;
        };
        if now < due {
            return;
        }

        match self.controller.advance(&mut self.screen) {
            Ok(Advance::Suspend(delay)) => {
                self.next_step_at = Some(now + delay);
                return;
            }
            Ok(Advance::Finished(outcome)) => {
                self.screen.summary = Some(outcome.summary);
            }
            Ok(Advance::Idle) => {}
            Err(err) => {
                error!(error = %err, "sort run failed");
                // The panic hook already left raw mode and the alternate screen.
                self.terminal_reset |= matches!(
                    err,
                    EngineError::Failure(EngineFailure::ProducerPanicked { .. })
                );
                self.screen.error = Some(err.to_string());
            }
        }
        self.next_step_at = None;
        self.stopping = false;
        self.screen.dirty = true;
    }

    /// Draw the current frame.
    pub fn render<W: Write>(&self, out: &mut W, width: u16, height: u16) -> io::Result<()> {
        let array = self.controller.array();
        let roles = self.roles(array.len());
        let config = self.controller.config();
        let model = ViewModel {
            array,
            roles: &roles,
            algorithm: config.algorithm(),
            status: self.status_text(),
            size: array.len(),
            delay_ms: config.delay_ms(),
            summary: self.screen.summary,
            error: self.screen.error.as_deref(),
            help: self.help,
        };
        view::render(out, &model, width, height)
    }

    /// Stop any active run, let the controller observe it, and flush the
    /// recording.
    pub fn shutdown(mut self) -> io::Result<()> {
        if self.controller.state() == RunState::Running {
            self.controller.stop();
            self.next_step_at = Some(Instant::now());
            self.tick(Instant::now());
        }
        match self.screen.recorder.take() {
            Some(recorder) => recorder.finish().map(drop),
            None => Ok(()),
        }
    }

    fn roles(&self, len: usize) -> Vec<Option<Role>> {
        let mut roles = vec![None; len];
        if let Some(snapshot) = &self.screen.snapshot {
            for highlight in &snapshot.highlights {
                if let Some(slot) = roles.get_mut(highlight.index)
                    && slot.is_none()
                {
                    *slot = Some(highlight.role);
                }
            }
        }
        roles
    }

    fn quit(&mut self) {
        info!("quit requested");
        self.should_quit = true;
    }

    fn toggle_run(&mut self, now: Instant) {
        if self.controller.state() == RunState::Running {
            if !self.stopping {
                self.controller.stop();
                self.stopping = true;
                self.next_step_at = Some(now);
            }
            return;
        }

        self.controller.acknowledge(&mut self.screen);
        self.screen.clear_run();
        match self.controller.start(&mut self.screen) {
            Ok(()) => self.next_step_at = Some(now),
            Err(err) => {
                warn!(error = %err, "start rejected");
                self.screen.error = Some(err.to_string());
            }
        }
    }

    fn regenerate(&mut self, size: usize) {
        match self.controller.regenerate(size) {
            Ok(true) => {
                self.controller.acknowledge(&mut self.screen);
                self.screen.clear_run();
            }
            Ok(false) => {}
            Err(err) => self.screen.error = Some(err.to_string()),
        }
    }

    fn resize(&mut self, grow: bool) {
        let current = self.controller.config().size();
        let size = if grow {
            current.saturating_add(SIZE_STEP)
        } else {
            current.saturating_sub(SIZE_STEP)
        }
        .clamp(*SIZE_RANGE.start(), *SIZE_RANGE.end());
        if size != current || self.controller.array().len() != size {
            self.regenerate(size);
        }
    }

    fn adjust_delay(&mut self, slower: bool) {
        let current = self.controller.config().delay_ms();
        let delay = if slower {
            current + delay_step(current, true)
        } else {
            current.saturating_sub(delay_step(current, false))
        }
        .clamp(*DELAY_RANGE_MS.start(), *DELAY_RANGE_MS.end());
        if let Err(err) = self.controller.set_delay(delay) {
            self.screen.error = Some(err.to_string());
        }
    }
}

/// Delay increment: fine below 100ms, coarse above 500ms. Steps taken up
/// and down from the same value cancel out.
fn delay_step(current: u64, up: bool) -> u64 {
    let edge = |limit: u64| if up { current < limit } else { current <= limit };
    if edge(100) {
        10
    } else if edge(500) {
        50
    } else {
        100
    }
}

/// Run the interactive frontend until the user quits.
///
/// # Errors
///
/// Terminal I/O failures, an unusable configuration, or a recording that
/// cannot be created or flushed.
pub fn run(opts: &Opts) -> io::Result<()> {
    let config = opts.config().map_err(io::Error::other)?;
    let generator = opts.seed.map_or_else(ArrayGenerator::new, ArrayGenerator::seeded);
    let controller = Controller::with_generator(config, generator);

    let mut app = App::new(controller);
    if let Some(path) = &opts.record {
        app = app.with_recorder(SnapshotRecorder::create(path)?);
    }
    info!(
        algorithm = %config.algorithm(),
        size = config.size(),
        delay_ms = config.delay_ms(),
        seed = ?opts.seed,
        "sortviz starting"
    );

    let session = TerminalSession::new(SessionOptions {
        alternate_screen: true,
        hide_cursor: true,
    })?;
    let deadline =
        (opts.exit_after_ms > 0).then(|| Instant::now() + Duration::from_millis(opts.exit_after_ms));
    let result = event_loop(&session, &mut app, deadline);
    drop(session);

    let finished = app.shutdown();
    result.and(finished)
}

fn event_loop(
    session: &TerminalSession,
    app: &mut App,
    deadline: Option<Instant>,
) -> io::Result<()> {
    let mut stdout = BufWriter::new(io::stdout());
    let (mut width, mut height) = session.size()?;

    loop {
        if app.take_dirty() {
            app.render(&mut stdout, width, height)?;
        }
        if app.should_quit() {
            return Ok(());
        }

        let now = Instant::now();
        let mut timeout = app.poll_timeout(now);
        if let Some(deadline) = deadline {
            if now >= deadline {
                info!("exit-after deadline reached");
                return Ok(());
            }
            timeout = timeout.min(deadline - now);
        }

        if session.poll_event(timeout)? {
            match session.read_event()? {
                Event::Key(key) => app.handle_key(key, Instant::now()),
                Event::Resize(w, h) => {
                    width = w;
                    height = h;
                    app.mark_dirty();
                }
                _ => {}
            }
        }
        app.tick(Instant::now());
        if app.take_terminal_reset() {
            session.restore()?;
        }
    }
}
