//! Runs the retry loop under a real `tracing` subscriber.

#![cfg(feature = "tracing")]

use std::time::Duration;

use retry_until::testing::RecordingReporter;
use retry_until::{run_with, Counter};

#[test]
fn retry_loop_under_fmt_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();

    let mut reporter = RecordingReporter::new();
    tracing::subscriber::with_default(subscriber, || {
        run_with(&mut reporter, &mut Counter::new(3, Duration::ZERO), |r| {
            r.fatal("not ready")
        });
    });

    assert_eq!(reporter.fail_count(), 1);
}
