//! Assertion macros for use inside check functions.
//!
//! Unlike `assert!`, these fail only the current attempt: the message is
//! recorded on the [`Attempt`](crate::Attempt) and the retry loop tries
//! again.
//!
//! ```rust
//! use retry_until::{eventually, retry_assert, retry_assert_eq};
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! let ready = AtomicU32::new(0);
//! eventually(|r| {
//!     let n = ready.fetch_add(1, Ordering::SeqCst);
//!     retry_assert!(r, n >= 1, "service not ready after {} polls", n);
//!     retry_assert_eq!(r, n.min(1), 1);
//! });
//! ```

/// Fail the current attempt unless a condition holds.
///
/// # Example
///
/// ```rust
/// use retry_until::{run_with, retry_assert, Counter};
/// use retry_until::testing::RecordingReporter;
/// use std::time::Duration;
///
/// let mut reporter = RecordingReporter::new();
/// run_with(&mut reporter, &mut Counter::new(1, Duration::ZERO), |r| {
///     retry_assert!(r, 1 + 1 == 3);
/// });
/// assert!(reporter.output().contains("assertion failed: 1 + 1 == 3"));
/// ```
#[macro_export]
macro_rules! retry_assert {
    ($attempt:expr, $cond:expr $(,)?) => {
        if !$cond {
            $attempt.fatal(concat!("assertion failed: ", stringify!($cond)));
        }
    };
    ($attempt:expr, $cond:expr, $($arg:tt)+) => {
        if !$cond {
            $attempt.fatal(format_args!($($arg)+));
        }
    };
}

/// Fail the current attempt unless two expressions are equal.
///
/// # Example
///
/// ```rust
/// use retry_until::{run_with, retry_assert_eq, Counter};
/// use retry_until::testing::RecordingReporter;
/// use std::time::Duration;
///
/// let mut reporter = RecordingReporter::new();
/// run_with(&mut reporter, &mut Counter::new(1, Duration::ZERO), |r| {
///     retry_assert_eq!(r, "green", "red");
/// });
/// assert!(reporter.output().contains(r#"left: "green", right: "red""#));
/// ```
#[macro_export]
macro_rules! retry_assert_eq {
    ($attempt:expr, $left:expr, $right:expr $(,)?) => {
        match (&$left, &$right) {
            (left, right) => {
                if !(*left == *right) {
                    $attempt.fatal(format_args!(
                        "assertion `left == right` failed: left: {:?}, right: {:?}",
                        left, right
                    ));
                }
            }
        }
    };
    ($attempt:expr, $left:expr, $right:expr, $($arg:tt)+) => {
        match (&$left, &$right) {
            (left, right) => {
                if !(*left == *right) {
                    $attempt.fatal(format_args!(
                        "assertion `left == right` failed: {}: left: {:?}, right: {:?}",
                        format_args!($($arg)+),
                        left,
                        right
                    ));
                }
            }
        }
    };
}

/// Fail the current attempt if two expressions are equal.
///
/// # Example
///
/// ```rust
/// use retry_until::{run_with, retry_assert_ne, Counter};
/// use retry_until::testing::RecordingReporter;
/// use std::time::Duration;
///
/// let mut reporter = RecordingReporter::new();
/// run_with(&mut reporter, &mut Counter::new(1, Duration::ZERO), |r| {
///     retry_assert_ne!(r, 0, 1);
/// });
/// assert!(!reporter.failed());
/// ```
#[macro_export]
macro_rules! retry_assert_ne {
    ($attempt:expr, $left:expr, $right:expr $(,)?) => {
        match (&$left, &$right) {
            (left, right) => {
                if *left == *right {
                    $attempt.fatal(format_args!(
                        "assertion `left != right` failed: left: {:?}, right: {:?}",
                        left, right
                    ));
                }
            }
        }
    };
    ($attempt:expr, $left:expr, $right:expr, $($arg:tt)+) => {
        match (&$left, &$right) {
            (left, right) => {
                if *left == *right {
                    $attempt.fatal(format_args!(
                        "assertion `left != right` failed: {}: left: {:?}, right: {:?}",
                        format_args!($($arg)+),
                        left,
                        right
                    ));
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::testing::RecordingReporter;
    use crate::{run_with, Counter};
    use std::time::Duration;

    fn single_attempt(f: impl FnMut(&mut crate::Attempt) + Send) -> RecordingReporter {
        let mut reporter = RecordingReporter::new();
        run_with(&mut reporter, &mut Counter::new(1, Duration::ZERO), f);
        reporter
    }

    #[test]
    fn retry_assert_passes() {
        let reporter = single_attempt(|r| retry_assert!(r, true));
        assert!(!reporter.failed());
    }

    #[test]
    fn retry_assert_records_condition() {
        let reporter = single_attempt(|r| retry_assert!(r, 2 < 1));
        assert!(reporter.failed());
        assert!(reporter.output().contains("macros.rs:"));
        assert!(reporter.output().contains("assertion failed: 2 < 1"));
    }

    #[test]
    fn retry_assert_custom_message() {
        let reporter = single_attempt(|r| retry_assert!(r, false, "queue depth {}", 4));
        assert!(reporter.output().ends_with(": queue depth 4\n"));
    }

    #[test]
    fn retry_assert_aborts_attempt() {
        let mut reached = false;
        single_attempt(|r| {
            retry_assert!(r, false);
            reached = true;
        });
        assert!(!reached);
    }

    #[test]
    fn retry_assert_eq_mismatch() {
        let reporter = single_attempt(|r| retry_assert_eq!(r, 1, 2, "counts"));
        assert!(reporter
            .output()
            .contains("assertion `left == right` failed: counts: left: 1, right: 2"));
    }

    #[test]
    fn retry_assert_ne_match() {
        let reporter = single_attempt(|r| retry_assert_ne!(r, "a", "a"));
        assert!(reporter
            .output()
            .contains(r#"assertion `left != right` failed: left: "a", right: "a""#));
    }
}
