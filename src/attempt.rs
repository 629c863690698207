//! The per-run context handed to check functions.
//!
//! An [`Attempt`] collects diagnostic lines for the whole retry run and
//! tracks whether the current attempt failed. Every recorded line is
//! prefixed with the file name and line number of the code that recorded
//! it, captured with `#[track_caller]` at the public method boundary.
//!
//! # Failing an attempt
//!
//! - [`Attempt::error`] records a message and marks the attempt failed, but
//!   the check function keeps running.
//! - [`Attempt::fatal`] records a message and leaves the check function
//!   immediately. Only the current attempt is abandoned; the retry loop
//!   carries on with the next one.
//! - [`Attempt::check`] unwraps a `Result`, calling `fatal` on errors.
//!
//! ```rust
//! use retry_until::{run_with, Counter};
//! use retry_until::testing::RecordingReporter;
//! use std::time::Duration;
//!
//! let mut reporter = RecordingReporter::new();
//! run_with(&mut reporter, &mut Counter::new(3, Duration::ZERO), |r| {
//!     let n: u32 = r.check("x".parse());
//!     r.log(format_args!("parsed {n}"));
//! });
//!
//! assert!(reporter.failed());
//! assert_eq!(reporter.logs().len(), 1);
//! ```

use std::fmt;
use std::panic::{self, Location};

/// Unwind payload raised by [`Attempt::fail_now`].
///
/// The retry loop recognises it at the attempt boundary and swallows it;
/// any other payload is a genuine panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Abort;

/// Context for a single retry run.
///
/// One `Attempt` lives for the whole run. Diagnostic lines accumulate across
/// attempts; the failure flag is cleared by the loop before each retry.
#[derive(Debug)]
pub struct Attempt {
    failed: bool,
    output: Vec<String>,
}

impl Attempt {
    pub(crate) fn new() -> Self {
        Self {
            failed: false,
            output: Vec::new(),
        }
    }

    /// Mark the attempt failed and stop executing it.
    ///
    /// The rest of the check function is skipped and the retry loop decides
    /// whether to try again.
    pub fn fail_now(&mut self) -> ! {
        self.failed = true;
        panic::resume_unwind(Box::new(Abort))
    }

    /// Record `msg` and stop executing the attempt.
    #[track_caller]
    pub fn fatal(&mut self, msg: impl fmt::Display) -> ! {
        self.record(Location::caller(), msg);
        self.fail_now()
    }

    /// Record `msg` and mark the attempt failed, but keep executing it.
    #[track_caller]
    pub fn error(&mut self, msg: impl fmt::Display) {
        self.record(Location::caller(), msg);
        self.failed = true;
    }

    /// Unwrap `result`, stopping the attempt with the error's message if it
    /// is an `Err`.
    #[track_caller]
    pub fn check<T, E: fmt::Display>(&mut self, result: Result<T, E>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                self.record(Location::caller(), err);
                self.fail_now()
            }
        }
    }

    /// Record `msg` without failing the attempt.
    #[track_caller]
    pub fn log(&mut self, msg: impl fmt::Display) {
        self.record(Location::caller(), msg);
    }

    /// Whether the current attempt has failed.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Every line recorded so far in this run, oldest first.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Clear the failure flag, returning its previous value.
    pub(crate) fn take_failed(&mut self) -> bool {
        std::mem::take(&mut self.failed)
    }

    fn record(&mut self, location: &Location<'_>, msg: impl fmt::Display) {
        self.output.push(decorate(location, msg));
    }
}

/// Prefix `msg` with the short file name and line of `location`.
fn decorate(location: &Location<'_>, msg: impl fmt::Display) -> String {
    format!("{}: {}", CallSite::from(location), msg)
}

/// A `file:line` pair rendered with only the last path component.
///
/// A file with no name renders as `???:1`.
struct CallSite<'a> {
    file: &'a str,
    line: u32,
}

impl<'a> From<&'a Location<'a>> for CallSite<'a> {
    fn from(location: &'a Location<'a>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for CallSite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.file.rsplit(['/', '\\']).next() {
            Some(short) if !short.is_empty() => write!(f, "{}:{}", short, self.line),
            _ => write!(f, "???:1"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::AssertUnwindSafe;

    #[track_caller]
    fn line_of_next_call() -> u32 {
        Location::caller().line() + 1
    }

    #[test]
    fn log_prefixes_call_site() {
        let mut attempt = Attempt::new();
        let line = line_of_next_call();
        attempt.log("hello");
        assert_eq!(attempt.output(), [format!("attempt.rs:{line}: hello")]);
        assert!(!attempt.failed());
    }

    #[test]
    fn error_marks_failed_and_continues() {
        let mut attempt = Attempt::new();
        attempt.error("first");
        attempt.error(format_args!("second {}", 2));
        assert!(attempt.failed());
        assert_eq!(attempt.output().len(), 2);
        assert!(attempt.output()[1].ends_with(": second 2"));
    }

    #[test]
    #[allow(unreachable_code)]
    fn fatal_unwinds_with_abort_marker() {
        let mut attempt = Attempt::new();
        let mut reached = false;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            attempt.fatal("boom");
            reached = true;
        }));

        let payload = result.expect_err("fatal must unwind");
        assert!(payload.downcast_ref::<Abort>().is_some());
        assert!(!reached);
        assert!(attempt.failed());
        assert!(attempt.output()[0].ends_with(": boom"));
    }

    #[test]
    fn check_returns_ok_value() {
        let mut attempt = Attempt::new();
        let value = attempt.check(Ok::<_, String>(7));
        assert_eq!(value, 7);
        assert!(attempt.output().is_empty());
        assert!(!attempt.failed());
    }

    #[test]
    fn check_aborts_with_error_message() {
        let mut attempt = Attempt::new();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            attempt.check("nope".parse::<u8>());
        }));
        assert!(result.is_err());
        assert!(attempt.failed());
        assert!(attempt.output()[0].ends_with(": invalid digit found in string"));
    }

    #[test]
    fn take_failed_clears_flag_but_keeps_output() {
        let mut attempt = Attempt::new();
        attempt.error("x");
        assert!(attempt.take_failed());
        assert!(!attempt.take_failed());
        assert_eq!(attempt.output().len(), 1);
    }

    #[test]
    fn call_site_uses_short_file_name() {
        let location = Location::caller();
        let rendered = CallSite::from(location).to_string();
        assert!(rendered.starts_with("attempt.rs:"));
        assert!(!rendered.contains('/'));
    }

    #[test]
    fn call_site_strips_directories() {
        let unix = CallSite { file: "tests/net/resolver.rs", line: 12 };
        assert_eq!(unix.to_string(), "resolver.rs:12");

        let windows = CallSite { file: r"tests\net\dns.rs", line: 3 };
        assert_eq!(windows.to_string(), "dns.rs:3");
    }

    #[test]
    fn call_site_without_file_name() {
        assert_eq!(CallSite { file: "", line: 40 }.to_string(), "???:1");
        assert_eq!(CallSite { file: "tests/", line: 40 }.to_string(), "???:1");
    }
}
