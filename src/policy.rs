//! Retry policy configuration.

use std::time::Duration;

/// A retry policy describing how failed operations are retried.
///
/// Policies are pure data - they describe retry behavior but don't execute it.
/// This makes them easy to test, clone, and inspect. Delays grow
/// exponentially: the wait before retry *k* (1-indexed) is
/// `base_delay * 2^(k-1)` plus an independently drawn uniform jitter sample.
///
/// # Bounds Behavior
///
/// `max_retries` counts retries *after* the first attempt, so a policy with
/// `max_retries = 3` allows up to 4 total attempts. `max_retries = 0` means
/// a single attempt with no retry.
///
/// # Examples
///
/// ```rust
/// use steadfast::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::exponential(Duration::from_millis(100))
///     .with_max_retries(5)
///     .without_jitter();
///
/// assert_eq!(policy.max_retries(), 5);
/// assert_eq!(policy.delay_for_attempt(0), Some(Duration::from_millis(100)));
/// assert_eq!(policy.delay_for_attempt(2), Some(Duration::from_millis(400)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    base_delay: Duration,
    max_retries: u32,
    jitter: Duration,
}

/// Default number of retries after the initial attempt.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default upper bound of the uniform jitter added to each delay.
const DEFAULT_JITTER: Duration = Duration::from_millis(1000);

impl RetryPolicy {
    /// Create a policy with exponentially increasing delay.
    ///
    /// Delay before retry k = `base * 2^(k-1)` + uniform jitter.
    /// Defaults to 3 retries and a 1s jitter bound.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use steadfast::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::exponential(Duration::from_millis(100));
    ///
    /// // Base delays double: 100ms, 200ms, 400ms
    /// assert_eq!(policy.delay_for_attempt(0), Some(Duration::from_millis(100)));
    /// assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_millis(200)));
    /// assert_eq!(policy.delay_for_attempt(2), Some(Duration::from_millis(400)));
    /// assert_eq!(policy.delay_for_attempt(3), None); // max_retries exceeded
    /// ```
    pub fn exponential(base_delay: Duration) -> Self {
        Self {
            base_delay,
            max_retries: DEFAULT_MAX_RETRIES,
            jitter: DEFAULT_JITTER,
        }
    }

    /// Set the maximum number of retry attempts.
    ///
    /// This does not include the initial attempt. For example, `max_retries(3)`
    /// means up to 4 total attempts (1 initial + 3 retries).
    pub fn with_max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the upper bound of the uniform jitter added to each delay.
    ///
    /// Each retry draws an independent sample from `[0, bound]` and adds it
    /// to the exponential delay. Jitter spreads out simultaneous retries so
    /// callers don't hammer a recovering service in lockstep.
    pub fn with_jitter(mut self, bound: Duration) -> Self {
        self.jitter = bound;
        self
    }

    /// Disable jitter entirely. Delays become deterministic.
    pub fn without_jitter(mut self) -> Self {
        self.jitter = Duration::ZERO;
        self
    }

    /// Get the maximum number of retries.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Get the base delay.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Get the jitter bound.
    pub fn jitter(&self) -> Duration {
        self.jitter
    }

    /// Calculate the deterministic delay after failed attempt N (0-indexed),
    /// before jitter.
    ///
    /// Returns `None` if no more retries should be attempted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use steadfast::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::exponential(Duration::from_millis(100))
    ///     .with_max_retries(2);
    ///
    /// assert_eq!(policy.delay_for_attempt(0), Some(Duration::from_millis(100)));
    /// assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_millis(200)));
    /// assert_eq!(policy.delay_for_attempt(2), None);
    /// ```
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries {
            return None;
        }
        Some(
            self.base_delay
                .saturating_mul(2u32.saturating_pow(attempt)),
        )
    }

    /// Calculate the delay after failed attempt N with jitter applied.
    ///
    /// The jitter sample is drawn independently per call, so two calls for
    /// the same attempt may differ. The result is always at least
    /// `delay_for_attempt(attempt)`.
    pub fn delay_with_jitter(&self, attempt: u32) -> Option<Duration> {
        let base = self.delay_for_attempt(attempt)?;
        Some(base.saturating_add(self.sample_jitter()))
    }

    fn sample_jitter(&self) -> Duration {
        use rand::Rng;

        let bound = self.jitter.as_millis() as u64;
        if bound == 0 {
            return Duration::ZERO;
        }
        let mut rng = rand::rng();
        Duration::from_millis(rng.random_range(0..=bound))
    }

    /// Validate the policy configuration.
    ///
    /// Returns an error message if `base_delay` is zero: an exponential
    /// schedule built on a zero base never backs off at all.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.base_delay.is_zero() {
            Err("RetryPolicy base_delay must be greater than zero")
        } else {
            Ok(())
        }
    }
}

impl Default for RetryPolicy {
    /// Mirrors the canonical configuration: 1s base delay, 3 retries,
    /// jitter drawn from up to 1s.
    fn default() -> Self {
        Self::exponential(Duration::from_millis(1000))
    }
}
