#![forbid(unsafe_code)]

//! Log subscriber setup.
//!
//! Stdout belongs to the terminal UI, so logs only go to a file. Without a
//! log file no subscriber is installed and every `tracing` call is a no-op.
//! The filter comes from `SORTVIZ_LOG` (e.g. `sortviz_core=trace`) and
//! defaults to `info`.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "SORTVIZ_LOG";

/// Failure to install the log subscriber.
#[derive(Debug)]
pub enum LoggingError {
    /// Log file could not be opened.
    Open(io::Error),
    /// A global subscriber is already installed.
    AlreadySet,
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(err) => write!(f, "cannot open log file: {err}"),
            Self::AlreadySet => f.write_str("a global tracing subscriber is already set"),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open(err) => Some(err),
            Self::AlreadySet => None,
        }
    }
}

/// Filter from `SORTVIZ_LOG`, or `info` when unset or malformed.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Build a file-backed formatting layer with `filter` attached.
///
/// # Errors
///
/// [`LoggingError::Open`] if the file cannot be opened for appending.
pub fn file_layer<S>(
    path: &Path,
    json: bool,
    filter: EnvFilter,
) -> Result<Box<dyn Layer<S> + Send + Sync>, LoggingError>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let file = open_append(path).map_err(LoggingError::Open)?;
    let writer = Mutex::new(file);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);
    Ok(if json {
        layer.json().with_filter(filter).boxed()
    } else {
        layer.with_filter(filter).boxed()
    })
}

/// Install the global subscriber. Does nothing when `path` is `None`.
///
/// # Errors
///
/// [`LoggingError`] if the file cannot be opened or a subscriber is
/// already installed.
pub fn init(path: Option<&Path>, json: bool) -> Result<(), LoggingError> {
    let Some(path) = path else {
        return Ok(());
    };
    let layer = file_layer(path, json, env_filter())?;
    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadySet)?;
    tracing::info!(path = ?path, json, "logging initialized");
    Ok(())
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
