//! Retry policies deciding whether another attempt should be made.
//!
//! A policy is consulted by the retry loop before every attempt. It either
//! lets the attempt go ahead (possibly after sleeping) or gives up, in which
//! case it calls the `fail` callback it was handed exactly once.
//!
//! # Examples
//!
//! ```rust
//! use retry_until::{Retryer, Timer};
//! use std::time::Duration;
//!
//! let mut timer = Timer::new(Duration::from_millis(20), Duration::from_millis(5));
//! let mut gave_up = false;
//!
//! // The first decision always allows an attempt.
//! assert!(timer.next(&mut || gave_up = true));
//! while timer.next(&mut || gave_up = true) {}
//! assert!(gave_up);
//! ```

use std::thread;
use std::time::{Duration, Instant};

/// Timeout used by [`Timer::default`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Wait between attempts used by [`Timer::default`].
pub const DEFAULT_WAIT: Duration = Duration::from_millis(25);

/// Decides whether an operation should be repeated.
///
/// `next` is called before every attempt, sequentially, from a single
/// controlling thread. It returns `true` if the attempt should go ahead.
/// Otherwise it calls `fail` exactly once and returns `false`.
pub trait Retryer {
    /// Returns `true` if another attempt should be made.
    fn next(&mut self, fail: &mut dyn FnMut()) -> bool;
}

impl<R: Retryer + ?Sized> Retryer for &mut R {
    fn next(&mut self, fail: &mut dyn FnMut()) -> bool {
        (**self).next(fail)
    }
}

impl<R: Retryer + ?Sized> Retryer for Box<R> {
    fn next(&mut self, fail: &mut dyn FnMut()) -> bool {
        (**self).next(fail)
    }
}

/// Repeats an operation for a given amount of time and waits between
/// subsequent attempts.
///
/// The deadline is set on the first call to [`Retryer::next`], so the clock
/// starts with the first attempt, not at construction. A timer that has
/// given up keeps giving up; call [`Timer::reset`] or build a new one to
/// drive another run.
///
/// Equality compares progress as well as configuration: a timer that has
/// made its first decision is not equal to a fresh one with the same
/// timeout and wait.
///
/// A timeout too large to be represented as an [`Instant`] means the timer
/// never gives up.
///
/// # Examples
///
/// ```rust
/// use retry_until::Timer;
/// use std::time::Duration;
///
/// let timer = Timer::default().with_timeout(Duration::from_secs(5));
/// assert_eq!(timer.timeout(), Duration::from_secs(5));
/// assert_eq!(timer.wait(), Duration::from_millis(25));
/// assert!(timer.deadline().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timer {
    timeout: Duration,
    wait: Duration,
    #[cfg_attr(feature = "serde", serde(skip))]
    progress: Progress,
}

/// Where a [`Timer`] is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Progress {
    #[default]
    NotStarted,
    Until(Instant),
    Unbounded,
}

impl Timer {
    /// Create a timer giving up after `timeout` and sleeping `wait` between
    /// attempts.
    pub fn new(timeout: Duration, wait: Duration) -> Self {
        Self {
            timeout,
            wait,
            progress: Progress::NotStarted,
        }
    }

    /// Set the total time budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the sleep between attempts.
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Get the total time budget.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the sleep between attempts.
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// The deadline, once the first decision has been made.
    ///
    /// `None` before the first decision and for timers that never give up.
    pub fn deadline(&self) -> Option<Instant> {
        match self.progress {
            Progress::Until(deadline) => Some(deadline),
            Progress::NotStarted | Progress::Unbounded => None,
        }
    }

    /// Whether the first decision has been made.
    pub fn started(&self) -> bool {
        self.progress != Progress::NotStarted
    }

    /// Forget the deadline so the next decision starts a fresh run.
    pub fn reset(&mut self) {
        self.progress = Progress::NotStarted;
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_WAIT)
    }
}

impl Retryer for Timer {
    fn next(&mut self, fail: &mut dyn FnMut()) -> bool {
        match self.progress {
            Progress::NotStarted => {
                self.progress = match Instant::now().checked_add(self.timeout) {
                    Some(deadline) => Progress::Until(deadline),
                    None => Progress::Unbounded,
                };
                return true;
            }
            Progress::Until(deadline) if Instant::now() > deadline => {
                fail();
                return false;
            }
            Progress::Until(_) | Progress::Unbounded => {}
        }
        thread::sleep(self.wait);
        true
    }
}

/// Repeats an operation a fixed number of times and waits between
/// subsequent attempts.
///
/// At least one attempt is always made, even when configured with a count
/// of zero.
///
/// Like [`Timer`], equality compares the attempts made so far as well as
/// the configuration.
///
/// # Examples
///
/// ```rust
/// use retry_until::{Counter, Retryer};
/// use std::time::Duration;
///
/// let mut counter = Counter::new(2, Duration::ZERO);
/// let mut failures = 0;
///
/// assert!(counter.next(&mut || failures += 1));
/// assert!(counter.next(&mut || failures += 1));
/// assert!(!counter.next(&mut || failures += 1));
/// assert_eq!(failures, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Counter {
    count: u32,
    wait: Duration,
    #[cfg_attr(feature = "serde", serde(skip))]
    attempts: u32,
}

impl Counter {
    /// Create a counter allowing `count` attempts with `wait` between them.
    pub fn new(count: u32, wait: Duration) -> Self {
        Self {
            count,
            wait,
            attempts: 0,
        }
    }

    /// Set the maximum number of attempts.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Set the sleep between attempts.
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Get the maximum number of attempts, never less than one.
    pub fn count(&self) -> u32 {
        self.count.max(1)
    }

    /// Get the sleep between attempts.
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Number of attempts allowed so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Forget progress so the next decision starts a fresh run.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

impl Retryer for Counter {
    fn next(&mut self, fail: &mut dyn FnMut()) -> bool {
        if self.attempts >= self.count() {
            fail();
            return false;
        }
        if self.attempts > 0 {
            thread::sleep(self.wait);
        }
        self.attempts += 1;
        true
    }
}
