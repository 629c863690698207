//! Testing utilities for code built on the retry harness.
//!
//! [`RecordingReporter`] stands in for a test framework: it remembers what
//! the retry loop reported instead of failing the surrounding test, so the
//! give-up path itself can be asserted on.
//!
//! # Examples
//!
//! ```rust
//! use retry_until::{run_with, Timer};
//! use retry_until::testing::RecordingReporter;
//! use std::time::Duration;
//!
//! let mut reporter = RecordingReporter::new();
//! let mut timer = Timer::new(Duration::from_millis(10), Duration::from_millis(5));
//! run_with(&mut reporter, &mut timer, |r| r.fatal("disk not mounted"));
//!
//! assert!(reporter.failed());
//! assert!(reporter.output().contains("disk not mounted"));
//! ```

use crate::reporter::Reporter;

/// A [`Reporter`] that records calls instead of acting on them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingReporter {
    logs: Vec<String>,
    fail_count: usize,
}

impl RecordingReporter {
    /// Create a reporter with nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `fail_now` was called.
    pub fn failed(&self) -> bool {
        self.fail_count > 0
    }

    /// How many times `fail_now` was called.
    pub fn fail_count(&self) -> usize {
        self.fail_count
    }

    /// Every string passed to `log`, in order.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// All logged output concatenated.
    pub fn output(&self) -> String {
        self.logs.concat()
    }
}

impl Reporter for RecordingReporter {
    fn log(&mut self, output: &str) {
        self.logs.push(output.to_string());
    }

    fn fail_now(&mut self) {
        self.fail_count += 1;
    }
}
