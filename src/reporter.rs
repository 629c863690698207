//! Host test-framework adapters.
//!
//! The retry loop never talks to a test runner directly. It only needs two
//! capabilities: print the final output, and fail the test. Any runner can
//! provide them by implementing [`Reporter`].

use std::fmt;

/// The reporting side of a test framework.
pub trait Reporter {
    /// Called once with the final test output when retrying is abandoned.
    fn log(&mut self, output: &str);

    /// Called when retrying is abandoned. Marks the test failed.
    fn fail_now(&mut self);
}

impl<T: Reporter + ?Sized> Reporter for &mut T {
    fn log(&mut self, output: &str) {
        (**self).log(output)
    }

    fn fail_now(&mut self) {
        (**self).fail_now()
    }
}

/// Reporter for the built-in Rust test harness.
///
/// Output is buffered and `fail_now` panics with it, which fails the
/// calling `#[test]` and stops it from running further.
///
/// # Examples
///
/// ```rust,should_panic
/// use retry_until::{run, PanicReporter};
///
/// run(&mut PanicReporter::new(), |r| r.fatal("never ready"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct PanicReporter {
    output: String,
}

impl PanicReporter {
    /// Create a reporter with no buffered output.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for PanicReporter {
    fn log(&mut self, output: &str) {
        self.output.push_str(output);
    }

    fn fail_now(&mut self) {
        panic!("{}", GaveUp(&self.output));
    }
}

struct GaveUp<'a>(&'a str);

impl fmt::Display for GaveUp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "retry gave up")
        } else {
            write!(f, "retry gave up:\n{}", self.0.trim_end())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "retry gave up:\nretry.rs:1: not yet")]
    fn panic_reporter_includes_output() {
        let mut reporter = PanicReporter::new();
        reporter.log("retry.rs:1: not yet\n");
        reporter.fail_now();
    }

    #[test]
    #[should_panic(expected = "retry gave up")]
    fn panic_reporter_without_output() {
        PanicReporter::new().fail_now();
    }

    #[test]
    fn gave_up_trims_trailing_newline() {
        assert_eq!(GaveUp("a\nb\n").to_string(), "retry gave up:\na\nb");
        assert_eq!(GaveUp("").to_string(), "retry gave up");
    }
}
