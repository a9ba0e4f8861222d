//! # Steadfast
//!
//! Retry with exponential backoff, jitter, and pluggable failure
//! diagnostics for async operations.
//!
//! Steadfast keeps a clean split between pure data and execution:
//! - [`RetryPolicy`] is pure configuration - delays are computable and
//!   testable without running anything.
//! - [`RetryingOperation`] is the imperative shell - it runs attempts,
//!   sleeps between them, and reports failures to a [`DiagnosticSink`].
//! - [`classify`] holds pure helpers that turn errors into presentation
//!   decisions (retry affordance, user-facing copy) without ever touching
//!   control flow.
//!
//! ## Quick Example
//!
//! ```rust
//! use steadfast::{RetryingOperation, RetryPolicy};
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let attempts = Arc::new(AtomicU32::new(0));
//!
//! let fetch = RetryingOperation::new(
//!     {
//!         let attempts = attempts.clone();
//!         move |_: ()| {
//!             let attempts = attempts.clone();
//!             async move {
//!                 if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
//!                     Err("connection reset")
//!                 } else {
//!                     Ok("pong")
//!                 }
//!             }
//!         }
//!     },
//!     RetryPolicy::exponential(Duration::from_millis(1)).without_jitter(),
//!     "ping",
//! );
//!
//! assert_eq!(fetch.call(()).await, Ok("pong"));
//! assert_eq!(attempts.load(Ordering::SeqCst), 3);
//! # });
//! ```
//!
//! ## Retry semantics
//!
//! Retries are blind: every failure is retried up to the policy's
//! `max_retries`, whether or not [`classify::is_recoverable`] considers it
//! transient. Classification exists for the caller's presentation layer
//! (show a retry button or not, pick user copy), and keeping the two apart
//! is deliberate. Only the final attempt's error reaches the caller, and it
//! arrives exactly as the operation produced it.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod classify;
pub mod operation;
pub mod policy;
pub mod report;
pub mod testing;

// Re-exports
pub use classify::{is_recoverable, user_message};
pub use operation::{log_failures, RetryingOperation};
pub use policy::RetryPolicy;
pub use report::{AttemptOutcome, DiagnosticSink, EnvironmentInfo, FailureReport, TracingSink};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::classify::{is_recoverable, user_message};
    pub use crate::operation::{log_failures, RetryingOperation};
    pub use crate::policy::RetryPolicy;
    pub use crate::report::{AttemptOutcome, DiagnosticSink, FailureReport, TracingSink};
}
