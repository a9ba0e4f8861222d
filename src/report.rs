//! Diagnostic records and the sink they flow into.
//!
//! Every failing attempt produces one [`FailureReport`] delivered to a
//! [`DiagnosticSink`]. The sink is an injected collaborator rather than a
//! global: production code typically uses [`TracingSink`], tests collect
//! reports with [`crate::testing::MemorySink`]. Reports carry diagnostic
//! context only - nothing downstream of the sink influences retry decisions.

use std::fmt;
use std::process;
use std::time::{Duration, SystemTime};

/// Runtime environment metadata attached to every failure report.
///
/// The moral equivalent of a browser's user agent and page URL: enough to
/// tell *where* a failure happened when reports from several processes land
/// in the same aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnvironmentInfo {
    /// Operating system the process is running on.
    pub os: &'static str,
    /// CPU architecture.
    pub arch: &'static str,
    /// Process id.
    pub pid: u32,
    /// Version of this crate.
    pub crate_version: &'static str,
}

impl EnvironmentInfo {
    /// Capture the current process environment.
    pub fn capture() -> Self {
        Self {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            pid: process::id(),
            crate_version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Structured record of one failing attempt.
///
/// Produced by the retry executor for every failure, terminal or not, and
/// handed to the configured [`DiagnosticSink`]. Purely diagnostic: the error
/// itself propagates to the caller separately and unchanged.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FailureReport {
    /// Label identifying the operation, e.g. `"fetch_summary"`.
    pub context: String,
    /// Which attempt failed (0-based; 0 is the initial attempt).
    pub attempt: u32,
    /// The error's display text.
    pub message: String,
    /// Debug rendering of the call arguments, if any were captured.
    pub arguments: Option<String>,
    /// When the failure was observed.
    pub timestamp: SystemTime,
    /// Where the failure was observed.
    pub environment: EnvironmentInfo,
}

impl FailureReport {
    /// Build a report for a failing attempt.
    pub fn new(
        context: impl Into<String>,
        attempt: u32,
        error: &dyn fmt::Display,
        arguments: Option<String>,
    ) -> Self {
        Self {
            context: context.into(),
            attempt,
            message: error.to_string(),
            arguments,
            timestamp: SystemTime::now(),
            environment: EnvironmentInfo::capture(),
        }
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] attempt {} failed: {}",
            self.context, self.attempt, self.message
        )
    }
}

/// Outcome of a single attempt, passed to the attempt hook.
///
/// Ephemeral: built per attempt and discarded once the hook returns.
#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    /// Which attempt this describes (0-based).
    pub attempt: u32,
    /// Whether the attempt succeeded.
    pub succeeded: bool,
    /// Display text of the error, for failed attempts.
    pub error: Option<String>,
    /// How long the attempt took.
    pub elapsed: Duration,
}

/// Destination for failure diagnostics.
///
/// Implementations must be cheap and non-blocking; the executor calls
/// [`record_failure`](DiagnosticSink::record_failure) inline between
/// attempts.
pub trait DiagnosticSink: Send + Sync {
    /// Record one failing attempt.
    fn record_failure(&self, report: &FailureReport);
}

/// Default sink: emits one `tracing` warning per failing attempt.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record_failure(&self, report: &FailureReport) {
        tracing::warn!(
            context = %report.context,
            attempt = report.attempt,
            arguments = report.arguments.as_deref().unwrap_or("<none>"),
            os = report.environment.os,
            pid = report.environment.pid,
            "operation failed: {}",
            report.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_fills_environment_fields() {
        let env = EnvironmentInfo::capture();
        assert!(!env.os.is_empty());
        assert!(!env.arch.is_empty());
        assert_eq!(env.crate_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn report_carries_error_text_and_context() {
        let report = FailureReport::new("fetch_reply", 2, &"socket closed", None);
        assert_eq!(report.context, "fetch_reply");
        assert_eq!(report.attempt, 2);
        assert_eq!(report.message, "socket closed");
        assert!(report.arguments.is_none());
    }

    #[test]
    fn report_display_is_readable() {
        let report = FailureReport::new("summarize", 0, &"timeout", Some("(42,)".to_string()));
        let text = format!("{}", report);
        assert!(text.contains("summarize"));
        assert!(text.contains("attempt 0"));
        assert!(text.contains("timeout"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn report_serializes_to_json() {
        let report = FailureReport::new("icebreaker", 1, &"network down", None);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"context\":\"icebreaker\""));
        assert!(json.contains("\"attempt\":1"));
    }
}
