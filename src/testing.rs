//! Testing utilities for retry behavior.
//!
//! Provides a scriptable flaky operation and an in-memory diagnostic sink so
//! tests can count attempts and assert on the reports a retry sequence
//! produced.
//!
//! # Examples
//!
//! ```rust
//! use steadfast::testing::{FlakyOperation, MemorySink};
//! use steadfast::{RetryingOperation, RetryPolicy};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let flaky = Arc::new(FlakyOperation::failing_first(2, "connection reset"));
//! let sink = Arc::new(MemorySink::new());
//!
//! let op = RetryingOperation::new(
//!     {
//!         let flaky = flaky.clone();
//!         move |_: ()| {
//!             let flaky = flaky.clone();
//!             async move { flaky.run().await }
//!         }
//!     },
//!     RetryPolicy::exponential(Duration::from_millis(1)).without_jitter(),
//!     "flaky",
//! )
//! .with_sink(sink.clone());
//!
//! assert_eq!(op.call(()).await, Ok("ok".to_string()));
//! assert_eq!(flaky.calls(), 3);
//! assert_eq!(sink.len(), 2);
//! # });
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use crate::report::{DiagnosticSink, FailureReport};

/// An operation that fails a scripted number of times before succeeding.
///
/// Stateful across calls so a single instance can be shared between the
/// attempts of one retry sequence; the call counter tells tests exactly how
/// many attempts ran.
#[derive(Debug)]
pub struct FlakyOperation {
    failures_before_success: u32,
    error_message: String,
    success_value: String,
    calls: AtomicU32,
}

impl FlakyOperation {
    /// Fail the first `failures` calls with `error_message`, then succeed
    /// with `"ok"`.
    pub fn failing_first(failures: u32, error_message: impl Into<String>) -> Self {
        Self {
            failures_before_success: failures,
            error_message: error_message.into(),
            success_value: "ok".to_string(),
            calls: AtomicU32::new(0),
        }
    }

    /// Fail every call with `error_message`.
    pub fn always_failing(error_message: impl Into<String>) -> Self {
        Self::failing_first(u32::MAX, error_message)
    }

    /// Replace the value returned once the operation starts succeeding.
    pub fn with_success_value(mut self, value: impl Into<String>) -> Self {
        self.success_value = value.into();
        self
    }

    /// Run one attempt.
    pub async fn run(&self) -> Result<String, String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures_before_success {
            Err(self.error_message.clone())
        } else {
            Ok(self.success_value.clone())
        }
    }

    /// How many times [`run`](Self::run) has been called.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

/// A [`DiagnosticSink`] that collects reports in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<FailureReport>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all reports recorded so far.
    pub fn reports(&self) -> Vec<FailureReport> {
        self.reports.lock().unwrap().clone()
    }

    /// Number of reports recorded.
    pub fn len(&self) -> usize {
        self.reports.lock().unwrap().len()
    }

    /// Whether no reports have been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for MemorySink {
    fn record_failure(&self, report: &FailureReport) {
        self.reports.lock().unwrap().push(report.clone());
    }
}
