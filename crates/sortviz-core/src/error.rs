#![forbid(unsafe_code)]

//! Error types for the sorting engine.
//!
//! Only [`ConfigError`] and [`EngineFailure`] are user-visible. Cancellation
//! is not an error: the controller turns it into [`RunState::Stopped`].
//!
//! [`RunState::Stopped`]: crate::controller::RunState::Stopped

use std::fmt;

use crate::step::Step;

/// Rejected configuration input. A run never starts with an invalid config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Array size outside [`SIZE_RANGE`](crate::config::SIZE_RANGE).
    SizeOutOfRange(usize),
    /// Delay outside [`DELAY_RANGE_MS`](crate::config::DELAY_RANGE_MS).
    DelayOutOfRange(u64),
    /// Algorithm key that does not name one of the six variants.
    UnknownAlgorithm(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeOutOfRange(size) => {
                let range = crate::config::SIZE_RANGE;
                write!(
                    f,
                    "array size {size} outside {}..={}",
                    range.start(),
                    range.end()
                )
            }
            Self::DelayOutOfRange(ms) => {
                let range = crate::config::DELAY_RANGE_MS;
                write!(
                    f,
                    "delay {ms}ms outside {}..={}ms",
                    range.start(),
                    range.end()
                )
            }
            Self::UnknownAlgorithm(key) => write!(
                f,
                "unknown algorithm '{key}' (expected bubble, selection, insertion, merge, quick or heap)"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Unexpected failure while producing or applying a step.
///
/// A failed run is never retried; the caller must start a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineFailure {
    /// A step addressed an index past the end of the array.
    IndexOutOfBounds {
        /// The offending step.
        step: Step,
        /// Array length at the time the step was applied.
        len: usize,
    },
    /// A step producer panicked.
    ProducerPanicked {
        /// Algorithm key of the producer.
        algorithm: &'static str,
        /// Message extracted from the panic payload.
        message: String,
    },
}

impl fmt::Display for EngineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfBounds { step, len } => {
                write!(f, "step {step:?} out of bounds for array of length {len}")
            }
            Self::ProducerPanicked { algorithm, message } => {
                write!(f, "{algorithm} producer panicked: {message}")
            }
        }
    }
}

impl std::error::Error for EngineFailure {}

/// Error returned by controller operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// `start` was called while a run is active. The request is ignored.
    AlreadyRunning,
    /// Configuration was rejected before any run began.
    InvalidConfiguration(ConfigError),
    /// The active run failed and moved to the `Failed` state.
    Failure(EngineFailure),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning => f.write_str("a sort run is already in progress"),
            Self::InvalidConfiguration(err) => write!(f, "invalid configuration: {err}"),
            Self::Failure(err) => write!(f, "engine failure: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AlreadyRunning => None,
            Self::InvalidConfiguration(err) => Some(err),
            Self::Failure(err) => Some(err),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfiguration(err)
    }
}

impl From<EngineFailure> for EngineError {
    fn from(err: EngineFailure) -> Self {
        Self::Failure(err)
    }
}
