#![forbid(unsafe_code)]

//! Cooperative cancellation for sort runs.
//!
//! The token is polled, never preemptive: the controller checks it only at
//! suspension points, so a cancelled run always leaves the array between
//! two whole steps. The same token backs the inter-step delay, which lets a
//! `stop()` from another thread cut a long delay short.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Shared stop flag for the active run.
///
/// Clones observe the same flag.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    /// Create a token in the cleared state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the active run to stop at its next suspension point.
    pub fn request(&self) {
        let (_, cvar) = &*self.inner;
        *self.flag() = true;
        cvar.notify_all();
    }

    /// Whether a stop has been requested since the last [`reset`](Self::reset).
    #[must_use]
    pub fn is_requested(&self) -> bool {
        *self.flag()
    }

    /// Clear the flag. Called once at the start of every run.
    pub fn reset(&self) {
        *self.flag() = false;
    }

    /// Sleep for `duration` unless a stop is requested first.
    ///
    /// Returns `true` if a stop was requested (before or during the wait),
    /// `false` if the full duration elapsed. Spurious wakeups are absorbed.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let (_, cvar) = &*self.inner;
        let mut requested = self.flag();
        if *requested {
            return true;
        }

        let start = Instant::now();
        let mut remaining = duration;

        loop {
            let (guard, result) = cvar
                .wait_timeout(requested, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            requested = guard;
            if *requested {
                return true;
            }
            if result.timed_out() {
                return false;
            }
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            remaining = duration - elapsed;
        }
    }

    fn flag(&self) -> MutexGuard<'_, bool> {
        let (lock, _) = &*self.inner;
        lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("requested", &self.is_requested())
            .finish()
    }
}
