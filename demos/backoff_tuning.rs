//! Backoff Tuning Demo
//!
//! Prints the delay schedule for a few policies so the effect of base delay,
//! retry bound, and jitter can be compared without running anything.

use std::time::Duration;

use steadfast::RetryPolicy;

fn print_schedule(label: &str, policy: &RetryPolicy) {
    println!("\n{label}");
    println!(
        "  base {:?}, {} retries, jitter up to {:?}",
        policy.base_delay(),
        policy.max_retries(),
        policy.jitter()
    );
    for attempt in 0..policy.max_retries() {
        let floor = policy.delay_for_attempt(attempt).unwrap();
        let sampled = policy.delay_with_jitter(attempt).unwrap();
        println!(
            "  after attempt {attempt}: floor {:>8?}, sampled {:>8?}",
            floor, sampled
        );
    }
}

fn main() {
    print_schedule("default (chat-demo config)", &RetryPolicy::default());

    print_schedule(
        "snappy UI retry",
        &RetryPolicy::exponential(Duration::from_millis(100))
            .with_max_retries(3)
            .with_jitter(Duration::from_millis(50)),
    );

    print_schedule(
        "patient background job",
        &RetryPolicy::exponential(Duration::from_secs(1))
            .with_max_retries(6)
            .without_jitter(),
    );
}
