//! Chat Assist Demo
//!
//! Wraps simulated AI chat features (smart reply, thread summary,
//! icebreaker) in retrying operations. Each simulated call sleeps to mimic
//! network latency and fails at random, so running the demo a few times
//! shows the whole range: immediate success, recovery after backoff, and
//! terminal failure with user-facing copy.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use steadfast::{is_recoverable, user_message, RetryPolicy, RetryingOperation, TracingSink};
use tokio::time::sleep;

const SMART_REPLIES: [&str; 4] = [
    "Sounds good, see you then!",
    "Thanks for the update.",
    "Let me check and get back to you.",
    "Great idea, let's do it.",
];

const ICEBREAKERS: [&str; 4] = [
    "What's the best thing that happened to you this week?",
    "Seen any good movies lately?",
    "Coffee or tea person?",
    "What are you working on these days?",
];

async fn simulate_latency() {
    let ms = rand::rng().random_range(50..250);
    sleep(Duration::from_millis(ms)).await;
}

fn maybe_fail(rate: f64, message: &str) -> Result<(), String> {
    if rand::rng().random_bool(rate) {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

async fn fetch_smart_reply(_: ()) -> Result<String, String> {
    simulate_latency().await;
    maybe_fail(0.4, "AI service temporarily unavailable")?;
    let pick = rand::rng().random_range(0..SMART_REPLIES.len());
    Ok(SMART_REPLIES[pick].to_string())
}

async fn fetch_icebreaker(_: ()) -> Result<String, String> {
    simulate_latency().await;
    maybe_fail(0.4, "network request failed")?;
    let pick = rand::rng().random_range(0..ICEBREAKERS.len());
    Ok(ICEBREAKERS[pick].to_string())
}

async fn fetch_summary(conversation_id: u32) -> Result<String, String> {
    simulate_latency().await;
    maybe_fail(0.4, "AI service temporarily unavailable")?;
    if conversation_id > 3 {
        // Persistent failure: retrying can't conjure missing data.
        return Err(format!("no summary for conversation {conversation_id}"));
    }
    Ok(format!(
        "Conversation {conversation_id}: planning a weekend trip, 14 messages"
    ))
}

fn report_outcome(label: &str, result: Result<String, String>) {
    match result {
        Ok(value) => println!("{label}: {value}"),
        Err(error) => {
            println!("{label} failed: {}", user_message(&error));
            if is_recoverable(&error) {
                println!("  (a retry button would be shown)");
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let policy = RetryPolicy::exponential(Duration::from_millis(200))
        .with_max_retries(3)
        .with_jitter(Duration::from_millis(100));
    let sink = Arc::new(TracingSink);

    let smart_reply = RetryingOperation::new(fetch_smart_reply, policy.clone(), "smart_reply")
        .with_sink(sink.clone());
    let icebreaker = RetryingOperation::new(fetch_icebreaker, policy.clone(), "icebreaker")
        .with_sink(sink.clone());
    let summary =
        RetryingOperation::new(fetch_summary, policy, "thread_summary").with_sink(sink);

    report_outcome("Smart reply", smart_reply.call(()).await);
    report_outcome("Icebreaker", icebreaker.call(()).await);
    report_outcome("Summary #2", summary.call(2).await);

    // Conversation 9 has no summary; the executor still retries blindly and
    // the final error is shown with its own text.
    report_outcome("Summary #9", summary.call(9).await);
}
