//! # retry-until
//!
//! Retry a test assertion until it passes, or until a retry policy gives up
//! and the test is failed with everything the assertion reported.
//!
//! Useful for checking eventually-consistent state from tests: a server that
//! is still starting, a file another thread is writing, a cache that has not
//! been invalidated yet.
//!
//! ## Quick Example
//!
//! ```rust
//! use retry_until::eventually;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! let started = AtomicU32::new(0);
//!
//! eventually(|r| {
//!     // Pretend the service needs a few polls to come up.
//!     if started.fetch_add(1, Ordering::SeqCst) < 3 {
//!         r.fatal("service not started");
//!     }
//!     r.log("service started");
//! });
//! ```
//!
//! ## Pieces
//!
//! - [`Retryer`] decides whether to make another attempt. [`Timer`] (the
//!   default, 2s with 25ms between attempts) and [`Counter`] are provided.
//! - [`Attempt`] is handed to the check function. [`Attempt::fatal`] stops
//!   the current attempt; [`Attempt::error`] marks it failed and carries on.
//! - [`Reporter`] is the test framework. [`PanicReporter`] fails the calling
//!   `#[test]` by panicking; [`testing::RecordingReporter`] just records.
//! - [`run`], [`run_with`] and [`eventually`] tie them together.
//!
//! ## Feature flags
//!
//! - `tracing`: emit `tracing` events for each attempt and on give up.
//! - `serde`: `Serialize`/`Deserialize` for the policy configuration.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod attempt;
mod macros;
pub mod policy;
pub mod reporter;
pub mod run;
pub mod testing;

// Re-exports
pub use attempt::Attempt;
pub use policy::{Counter, Retryer, Timer, DEFAULT_TIMEOUT, DEFAULT_WAIT};
pub use reporter::{PanicReporter, Reporter};
pub use run::{dedup, eventually, run, run_with};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::attempt::Attempt;
    pub use crate::policy::{Counter, Retryer, Timer};
    pub use crate::reporter::{PanicReporter, Reporter};
    pub use crate::run::{eventually, run, run_with};
    pub use crate::{retry_assert, retry_assert_eq, retry_assert_ne};
}
