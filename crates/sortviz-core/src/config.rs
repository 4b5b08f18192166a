#![forbid(unsafe_code)]

//! Run configuration and its bounds.

use std::ops::RangeInclusive;
use std::time::Duration;

use crate::algorithm::Algorithm;
use crate::error::ConfigError;

/// Allowed array sizes.
pub const SIZE_RANGE: RangeInclusive<usize> = 10..=100;

/// Allowed per-step delay, in milliseconds.
pub const DELAY_RANGE_MS: RangeInclusive<u64> = 10..=1000;

/// Array size used when nothing else is configured.
pub const DEFAULT_SIZE: usize = 20;

/// Per-step delay used when nothing else is configured.
pub const DEFAULT_DELAY_MS: u64 = 300;

/// Validated engine configuration.
///
/// Fields are private so every `Config` in circulation is within bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    algorithm: Algorithm,
    size: usize,
    delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            size: DEFAULT_SIZE,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl Config {
    /// Build a configuration, rejecting out-of-range values.
    ///
    /// # Errors
    ///
    /// [`ConfigError::SizeOutOfRange`] or [`ConfigError::DelayOutOfRange`].
    pub fn new(algorithm: Algorithm, size: usize, delay_ms: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            algorithm,
            size: validate_size(size)?,
            delay_ms: validate_delay(delay_ms)?,
        })
    }

    /// Reassemble a configuration from values that were validated earlier.
    pub(crate) const fn from_parts(algorithm: Algorithm, size: usize, delay_ms: u64) -> Self {
        Self {
            algorithm,
            size,
            delay_ms,
        }
    }

    /// Selected algorithm.
    #[inline]
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Array size used by `regenerate`.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Per-step delay in milliseconds.
    #[inline]
    #[must_use]
    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Per-step delay.
    #[inline]
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Replace the algorithm.
    #[must_use]
    pub const fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Replace the size.
    ///
    /// # Errors
    ///
    /// [`ConfigError::SizeOutOfRange`].
    pub fn with_size(mut self, size: usize) -> Result<Self, ConfigError> {
        self.size = validate_size(size)?;
        Ok(self)
    }

    /// Replace the delay.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DelayOutOfRange`].
    pub fn with_delay_ms(mut self, delay_ms: u64) -> Result<Self, ConfigError> {
        self.delay_ms = validate_delay(delay_ms)?;
        Ok(self)
    }
}

/// Check `size` against [`SIZE_RANGE`].
///
/// # Errors
///
/// [`ConfigError::SizeOutOfRange`].
pub fn validate_size(size: usize) -> Result<usize, ConfigError> {
    if SIZE_RANGE.contains(&size) {
        Ok(size)
    } else {
        Err(ConfigError::SizeOutOfRange(size))
    }
}

/// Check `delay_ms` against [`DELAY_RANGE_MS`].
///
/// # Errors
///
/// [`ConfigError::DelayOutOfRange`].
pub fn validate_delay(delay_ms: u64) -> Result<u64, ConfigError> {
    if DELAY_RANGE_MS.contains(&delay_ms) {
        Ok(delay_ms)
    } else {
        Err(ConfigError::DelayOutOfRange(delay_ms))
    }
}
