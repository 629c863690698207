//! The retry loop.
//!
//! [`run_with`] drives a check function with a [`Retryer`] until the check
//! passes or the retryer gives up:
//!
//! ```text
//! AwaitingDecision --next() == true--> RunningAttempt
//! RunningAttempt   --failed----------> AwaitingDecision
//! RunningAttempt   --passed----------> Succeeded
//! AwaitingDecision --next() == false-> GaveUp
//! ```
//!
//! Each attempt runs on its own scoped thread so that [`Attempt::fatal`] can
//! unwind out of the check function without taking the loop down with it.
//! Attempts never overlap: the loop joins the attempt thread before looking
//! at the result.
//!
//! Aborting an attempt relies on unwinding, so the harness needs
//! `panic = "unwind"`, which is what test profiles use.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crate::attempt::{Abort, Attempt};
use crate::policy::{Retryer, Timer};
use crate::reporter::{PanicReporter, Reporter};

/// Name given to the thread each attempt runs on.
pub const ATTEMPT_THREAD: &str = "retry-attempt";

/// Retry `f` every 25ms for up to 2s, stopping as soon as it passes.
///
/// On give up the distinct recorded lines are logged to `t` and the test is
/// failed with [`Reporter::fail_now`].
///
/// # Examples
///
/// ```rust
/// use retry_until::{run, PanicReporter};
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// let polls = AtomicU32::new(0);
/// run(&mut PanicReporter::new(), |r| {
///     if polls.fetch_add(1, Ordering::SeqCst) < 2 {
///         r.fatal("not ready");
///     }
/// });
/// assert_eq!(polls.load(Ordering::SeqCst), 3);
/// ```
pub fn run<T, F>(t: &mut T, f: F)
where
    T: Reporter + ?Sized,
    F: FnMut(&mut Attempt) + Send,
{
    run_with(t, &mut Timer::default(), f)
}

/// Retry `f` inside a `#[test]`, panicking with the recorded output if it
/// never passes.
///
/// Shorthand for [`run`] with a [`PanicReporter`].
pub fn eventually<F>(f: F)
where
    F: FnMut(&mut Attempt) + Send,
{
    run(&mut PanicReporter::new(), f)
}

/// Retry `f` until it passes or `retryer` gives up.
///
/// Returns normally in both cases; giving up is signalled only through
/// `t`. A panic inside `f` that did not come from [`Attempt`] is not a
/// failed attempt and is resumed on the calling thread.
///
/// # Examples
///
/// ```rust
/// use retry_until::{run_with, Counter};
/// use retry_until::testing::RecordingReporter;
/// use std::time::Duration;
///
/// let mut reporter = RecordingReporter::new();
/// let mut calls = 0;
/// run_with(&mut reporter, &mut Counter::new(3, Duration::ZERO), |r| {
///     calls += 1;
///     r.error("still failing");
/// });
///
/// assert_eq!(calls, 3);
/// assert!(reporter.failed());
/// ```
pub fn run_with<T, R, F>(t: &mut T, retryer: &mut R, mut f: F)
where
    T: Reporter + ?Sized,
    R: Retryer + ?Sized,
    F: FnMut(&mut Attempt) + Send,
{
    let mut attempt = Attempt::new();
    #[cfg(feature = "tracing")]
    let mut number = 0u64;
    while retryer.next(&mut || give_up(&mut *t, &attempt)) {
        run_attempt(&mut attempt, &mut f);
        #[cfg(feature = "tracing")]
        {
            number += 1;
        }
        if !attempt.take_failed() {
            #[cfg(feature = "tracing")]
            tracing::debug!(attempts = number, "check passed");
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(attempt = number, "check failed, retrying");
    }
}

/// Join every distinct line, in first-seen order, each followed by `\n`.
///
/// # Examples
///
/// ```rust
/// use retry_until::dedup;
///
/// assert_eq!(dedup(&["a", "b", "a", "c", "b"]), "a\nb\nc\n");
/// assert_eq!(dedup::<&str>(&[]), "");
/// ```
pub fn dedup<S: AsRef<str>>(lines: &[S]) -> String {
    let mut seen = HashSet::new();
    let mut out = String::new();
    for line in lines {
        let line = line.as_ref();
        if seen.insert(line) {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

fn give_up<T: Reporter + ?Sized>(t: &mut T, attempt: &Attempt) {
    let out = dedup(attempt.output());
    #[cfg(feature = "tracing")]
    tracing::warn!(lines = attempt.output().len(), "retry gave up");
    if !out.is_empty() {
        t.log(&out);
    }
    t.fail_now();
}

/// Run one attempt of `f` in isolation and wait for it to finish.
fn run_attempt<F>(attempt: &mut Attempt, f: &mut F)
where
    F: FnMut(&mut Attempt) + Send,
{
    let spawned = thread::scope(|scope| {
        thread::Builder::new()
            .name(ATTEMPT_THREAD.to_string())
            .spawn_scoped(scope, || f(attempt))
            .map(|handle| handle.join())
    });
    let outcome = match spawned {
        Ok(outcome) => outcome,
        Err(err) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("cannot spawn attempt thread, running inline: {}", err);
            #[cfg(not(feature = "tracing"))]
            let _ = err;
            panic::catch_unwind(AssertUnwindSafe(|| f(attempt)))
        }
    };
    if let Err(payload) = outcome {
        if payload.downcast_ref::<Abort>().is_none() {
            panic::resume_unwind(payload);
        }
    }
}
