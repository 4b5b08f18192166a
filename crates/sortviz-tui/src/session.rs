#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! RAII ownership of raw mode and the alternate screen. Every mode that was
//! switched on is switched off again, in reverse order, on any exit path:
//!
//! - normal drop,
//! - panic (a panic hook restores the terminal before the message prints;
//!   if the panic is caught, [`TerminalSession::restore`] switches the modes
//!   back on),
//! - SIGINT/SIGTERM on unix (a signal thread restores and exits `128 + sig`).
//!
//! # Cleanup Order
//!
//! 1. Reset colors, show cursor (if hidden)
//! 2. Leave alternate screen (if entered)
//! 3. Exit raw mode
//! 4. Flush stdout

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use crossterm::event::Event;
use tracing::{info, warn};

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Modes to enable when the session starts.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Switch to the alternate screen buffer (`CSI ? 1049 h`), leaving the
    /// user's scrollback untouched.
    pub alternate_screen: bool,
    /// Hide the cursor while the session is active.
    pub hide_cursor: bool,
}

/// Raw-mode terminal session. Restores the terminal when dropped.
///
/// Only one session should exist at a time.
#[derive(Debug)]
pub struct TerminalSession {
    alternate_screen_enabled: bool,
    cursor_hidden: bool,
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl TerminalSession {
    /// Enter raw mode and enable the requested modes.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or any requested mode cannot be enabled.
    /// Modes enabled before the failure are rolled back by `Drop`.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        info!("terminal raw mode enabled");

        let mut session = Self {
            alternate_screen_enabled: false,
            cursor_hidden: false,
            #[cfg(unix)]
            signal_guard: None,
        };

        #[cfg(unix)]
        {
            session.signal_guard = Some(SignalGuard::new()?);
        }

        let mut stdout = io::stdout();

        if options.alternate_screen {
            crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
            session.alternate_screen_enabled = true;
            info!("alternate screen enabled");
        }

        if options.hide_cursor {
            crossterm::execute!(stdout, crossterm::cursor::Hide)?;
            session.cursor_hidden = true;
        }

        Ok(session)
    }

    /// Current terminal size (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    /// Wait up to `timeout` for an event. `Ok(true)` if one is ready.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    /// Read the next event, blocking until one is available.
    pub fn read_event(&self) -> io::Result<Event> {
        crossterm::event::read()
    }

    /// Re-enable the session's modes after a panic hook has restored the
    /// terminal while the program keeps running.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or a mode cannot be re-enabled.
    pub fn restore(&self) -> io::Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if self.alternate_screen_enabled {
            crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
        }
        if self.cursor_hidden {
            crossterm::execute!(stdout, crossterm::cursor::Hide)?;
        }
        info!("terminal modes restored");
        Ok(())
    }

    fn cleanup(&mut self) {
        #[cfg(unix)]
        let _ = self.signal_guard.take();

        let mut stdout = io::stdout();

        let _ = crossterm::execute!(stdout, crossterm::style::ResetColor);
        if self.cursor_hidden {
            let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
            self.cursor_hidden = false;
        }

        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
            info!("alternate screen disabled");
        }

        let _ = crossterm::terminal::disable_raw_mode();
        info!("terminal raw mode disabled");

        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(
        stdout,
        crossterm::style::ResetColor,
        crossterm::cursor::Show,
        crossterm::terminal::LeaveAlternateScreen
    );
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            for signal in signals.forever() {
                if matches!(signal, SIGINT | SIGTERM) {
                    warn!(signal, "termination signal received, cleaning up");
                    best_effort_cleanup();
                    std::process::exit(128 + signal);
                }
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
