//! The retry executor.
//!
//! [`RetryingOperation`] wraps a fallible async operation and gives it
//! retry-on-failure semantics: exponential backoff with jitter between
//! attempts, one [`FailureReport`] per failing attempt, and the final error
//! propagated to the caller unchanged.
//!
//! Retries are deliberately blind: every failure is retried up to the policy
//! bound, whether or not [`crate::classify::is_recoverable`] would consider
//! it transient. Classification exists for the caller's presentation layer,
//! not for the executor.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use crate::policy::RetryPolicy;
use crate::report::{AttemptOutcome, DiagnosticSink, FailureReport, TracingSink};

/// An async operation wrapped with retry, backoff, and failure diagnostics.
///
/// The wrapped operation is a factory: each attempt invokes it again with a
/// fresh clone of the arguments. Retry means "try this operation again from
/// scratch", so operations should be safe to re-run (in the surrounding
/// system they are idempotent fetches).
///
/// A single `call` runs strictly one attempt at a time; attempt k+1 never
/// begins before attempt k has failed and the backoff delay has elapsed.
/// There is no cancellation: a call runs to success or terminal failure.
///
/// # Examples
///
/// ```rust
/// use steadfast::{RetryingOperation, RetryPolicy};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let double = RetryingOperation::new(
///     |n: u32| async move { Ok::<_, String>(n * 2) },
///     RetryPolicy::exponential(Duration::from_millis(10)).with_max_retries(2),
///     "double",
/// );
///
/// assert_eq!(double.call(21).await, Ok(42));
/// # });
/// ```
pub struct RetryingOperation<F> {
    operation: F,
    policy: RetryPolicy,
    context: String,
    sink: Arc<dyn DiagnosticSink>,
    attempt_hook: Option<Arc<dyn Fn(&AttemptOutcome) + Send + Sync>>,
}

impl<F> RetryingOperation<F> {
    /// Wrap an operation with the given policy and context label.
    ///
    /// The context label attributes failure reports to this operation; it
    /// never affects control flow. Diagnostics go to [`TracingSink`] unless
    /// replaced via [`with_sink`](Self::with_sink).
    pub fn new(operation: F, policy: RetryPolicy, context: impl Into<String>) -> Self {
        Self {
            operation,
            policy,
            context: context.into(),
            sink: Arc::new(TracingSink),
            attempt_hook: None,
        }
    }

    /// Replace the diagnostic sink.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Observe every attempt (successful or not) via a hook.
    ///
    /// The hook is synchronous and should not block; use it for metrics or
    /// test assertions.
    pub fn with_attempt_hook<H>(mut self, hook: H) -> Self
    where
        H: Fn(&AttemptOutcome) + Send + Sync + 'static,
    {
        self.attempt_hook = Some(Arc::new(hook));
        self
    }

    /// The policy governing this operation's retries.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The context label used in failure reports.
    pub fn context(&self) -> &str {
        &self.context
    }

    fn observe(&self, outcome: &AttemptOutcome) {
        if let Some(hook) = &self.attempt_hook {
            hook(outcome);
        }
    }

    /// Invoke the wrapped operation, retrying on failure.
    ///
    /// Attempt 0 runs immediately. On success the value is returned at once
    /// and no further attempts occur. On failure a [`FailureReport`] is
    /// recorded; if the failed attempt index equals the policy's
    /// `max_retries` the error is returned to the caller exactly as the
    /// operation produced it, otherwise the call sleeps for the jittered
    /// backoff delay and tries again.
    ///
    /// Arguments are cloned per attempt and Debug-rendered into each report.
    /// Intermediate errors are logged but never surfaced; only the terminal
    /// error reaches the caller, unwrapped and unaggregated.
    pub async fn call<A, T, E, Fut>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Fut,
        A: Clone + fmt::Debug,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut attempt = 0u32;

        loop {
            let started = Instant::now();
            match (self.operation)(args.clone()).await {
                Ok(value) => {
                    self.observe(&AttemptOutcome {
                        attempt,
                        succeeded: true,
                        error: None,
                        elapsed: started.elapsed(),
                    });
                    return Ok(value);
                }
                Err(error) => {
                    self.observe(&AttemptOutcome {
                        attempt,
                        succeeded: false,
                        error: Some(error.to_string()),
                        elapsed: started.elapsed(),
                    });

                    let report = FailureReport::new(
                        self.context.clone(),
                        attempt,
                        &error,
                        Some(format!("{:?}", args)),
                    );
                    self.sink.record_failure(&report);

                    match self.policy.delay_with_jitter(attempt) {
                        Some(delay) => {
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                        }
                        None => return Err(error),
                    }
                }
            }
        }
    }
}

impl<F> fmt::Debug for RetryingOperation<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryingOperation")
            .field("context", &self.context)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Run a future once, reporting any failure before propagating it.
///
/// The no-retry sibling of [`RetryingOperation`]: useful where a failure
/// should be diagnosed but retrying is someone else's decision.
///
/// # Examples
///
/// ```rust
/// use steadfast::{log_failures, TracingSink};
///
/// # tokio_test::block_on(async {
/// let result = log_failures(
///     async { Err::<(), _>("connection dropped") },
///     "send_message",
///     &TracingSink,
/// )
/// .await;
///
/// assert_eq!(result, Err("connection dropped"));
/// # });
/// ```
pub async fn log_failures<T, E, Fut>(
    future: Fut,
    context: &str,
    sink: &dyn DiagnosticSink,
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    match future.await {
        Ok(value) => Ok(value),
        Err(error) => {
            sink.record_failure(&FailureReport::new(context, 0, &error, None));
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemorySink;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn quick_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::exponential(Duration::from_millis(1))
            .with_max_retries(max_retries)
            .without_jitter()
    }

    #[tokio::test]
    async fn succeeds_on_third_attempt() {
        let attempts = Arc::new(AtomicU32::new(0));

        let op = RetryingOperation::new(
            {
                let attempts = attempts.clone();
                move |_: ()| {
                    let attempts = attempts.clone();
                    async move {
                        let n = attempts.fetch_add(1, Ordering::SeqCst);
                        if n < 2 {
                            Err("connection dropped")
                        } else {
                            Ok("success")
                        }
                    }
                }
            },
            quick_policy(5),
            "flaky",
        );

        let result = op.call(()).await;

        assert_eq!(result, Ok("success"));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_returns_last_error() {
        let attempts = Arc::new(AtomicU32::new(0));

        let op = RetryingOperation::new(
            {
                let attempts = attempts.clone();
                move |_: ()| {
                    let attempts = attempts.clone();
                    async move {
                        let n = attempts.fetch_add(1, Ordering::SeqCst);
                        Err::<(), _>(format!("failure #{n}"))
                    }
                }
            },
            quick_policy(3),
            "doomed",
        );

        let result = op.call(()).await;

        // 1 initial + 3 retries; the error from the final attempt wins.
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
        assert_eq!(result, Err("failure #3".to_string()));
    }

    #[tokio::test]
    async fn one_report_per_failing_attempt() {
        let sink = Arc::new(MemorySink::new());

        let op = RetryingOperation::new(
            |_: ()| async { Err::<(), _>("AI service temporarily unavailable") },
            quick_policy(2),
            "fetch_summary",
        )
        .with_sink(sink.clone());

        let _ = op.call(()).await;

        let reports = sink.reports();
        assert_eq!(reports.len(), 3);
        for (i, report) in reports.iter().enumerate() {
            assert_eq!(report.context, "fetch_summary");
            assert_eq!(report.attempt, i as u32);
            assert_eq!(report.message, "AI service temporarily unavailable");
        }
    }

    #[tokio::test]
    async fn success_emits_no_reports() {
        let sink = Arc::new(MemorySink::new());

        let op = RetryingOperation::new(
            |_: ()| async { Ok::<_, String>("hello") },
            quick_policy(5),
            "greeting",
        )
        .with_sink(sink.clone());

        assert_eq!(op.call(()).await, Ok("hello"));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn arguments_are_rendered_into_reports() {
        let sink = Arc::new(MemorySink::new());

        let op = RetryingOperation::new(
            |_id: u64| async { Err::<(), _>("no such conversation") },
            quick_policy(0),
            "fetch_messages",
        )
        .with_sink(sink.clone());

        let _ = op.call(17u64).await;

        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].arguments.as_deref(), Some("17"));
    }

    #[tokio::test]
    async fn attempt_hook_sees_every_attempt() {
        let outcomes = Arc::new(std::sync::Mutex::new(Vec::new()));
        let attempts = Arc::new(AtomicU32::new(0));

        let op = RetryingOperation::new(
            {
                let attempts = attempts.clone();
                move |_: ()| {
                    let attempts = attempts.clone();
                    async move {
                        let n = attempts.fetch_add(1, Ordering::SeqCst);
                        if n < 1 {
                            Err("transient")
                        } else {
                            Ok("done")
                        }
                    }
                }
            },
            quick_policy(3),
            "hooked",
        )
        .with_attempt_hook({
            let outcomes = outcomes.clone();
            move |outcome: &AttemptOutcome| {
                outcomes.lock().unwrap().push(outcome.clone());
            }
        });

        let result = op.call(()).await;
        assert_eq!(result, Ok("done"));

        let outcomes = outcomes.lock().unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].succeeded);
        assert_eq!(outcomes[0].error.as_deref(), Some("transient"));
        assert!(outcomes[1].succeeded);
        assert_eq!(outcomes[1].attempt, 1);
    }

    #[tokio::test]
    async fn zero_retries_fails_after_single_attempt() {
        let attempts = Arc::new(AtomicU32::new(0));

        let op = RetryingOperation::new(
            {
                let attempts = attempts.clone();
                move |_: ()| {
                    let attempts = attempts.clone();
                    async move {
                        attempts.fetch_add(1, Ordering::SeqCst);
                        Err::<(), _>("nope")
                    }
                }
            },
            quick_policy(0),
            "one_shot",
        );

        assert_eq!(op.call(()).await, Err("nope"));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn log_failures_reports_and_propagates() {
        let sink = MemorySink::new();

        let result = log_failures(
            async { Err::<(), _>("network reset") },
            "send_message",
            &sink,
        )
        .await;

        assert_eq!(result, Err("network reset"));
        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].context, "send_message");
        assert_eq!(reports[0].attempt, 0);
    }

    #[tokio::test]
    async fn log_failures_is_silent_on_success() {
        let sink = MemorySink::new();

        let result = log_failures(async { Ok::<_, String>(7) }, "fetch", &sink).await;

        assert_eq!(result, Ok(7));
        assert!(sink.is_empty());
    }
}
