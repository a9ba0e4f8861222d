//! Pure error classification and user-facing copy.
//!
//! These functions inspect only an error's display text and have no side
//! effects. They inform the *caller's* presentation decisions (whether to
//! offer a retry button, which message to show); the retry executor itself
//! never consults them - it retries every failure up to the policy bound.

use std::fmt;

/// Message fragments that indicate a plausibly transient failure.
///
/// Matching is case-insensitive substring containment.
const RECOVERABLE_INDICATORS: [&str; 5] = [
    "network",
    "timeout",
    "temporarily unavailable",
    "service unavailable",
    "connection",
];

/// Whether an error looks transient enough that retrying is reasonable.
///
/// Pure predicate over the error's display text. Used by callers to decide
/// whether to surface a retry affordance; it does not gate the executor's
/// own retries.
///
/// # Examples
///
/// ```rust
/// use steadfast::classify::is_recoverable;
///
/// assert!(is_recoverable(&"Network request failed"));
/// assert!(is_recoverable(&"connection reset by peer"));
/// assert!(!is_recoverable(&"no summary available for this conversation"));
/// ```
pub fn is_recoverable(error: &dyn fmt::Display) -> bool {
    let message = error.to_string().to_lowercase();
    RECOVERABLE_INDICATORS
        .iter()
        .any(|indicator| message.contains(indicator))
}

/// Map an error to a human-readable message suitable for end users.
///
/// Recognized categories get specific copy; anything else falls back to the
/// error's own text, or a generic message when the text is empty.
///
/// # Examples
///
/// ```rust
/// use steadfast::classify::user_message;
///
/// assert_eq!(
///     user_message(&"request timeout after 30s"),
///     "The request timed out. Please try again.",
/// );
/// assert_eq!(user_message(&"row not found"), "row not found");
/// assert_eq!(user_message(&""), "An unexpected error occurred");
/// ```
pub fn user_message(error: &dyn fmt::Display) -> String {
    let message = error.to_string();
    let lower = message.to_lowercase();

    if lower.contains("network") || lower.contains("connection") || lower.contains("fetch") {
        return "Network connection failed. Please check your internet connection and try again."
            .to_string();
    }
    if lower.contains("timeout") || lower.contains("timed out") {
        return "The request timed out. Please try again.".to_string();
    }
    if lower.contains("ai service") {
        return "AI service is temporarily unavailable. Please try again in a moment.".to_string();
    }

    if message.is_empty() {
        "An unexpected error occurred".to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_recoverable_indicator_matches() {
        assert!(is_recoverable(&"network unreachable"));
        assert!(is_recoverable(&"operation timeout"));
        assert!(is_recoverable(&"backend temporarily unavailable"));
        assert!(is_recoverable(&"503 Service Unavailable"));
        assert!(is_recoverable(&"connection refused"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(is_recoverable(&"NETWORK DOWN"));
        assert!(is_recoverable(&"Request Timeout"));
        assert!(is_recoverable(&"AI service temporarily unavailable"));
    }

    #[test]
    fn unrelated_errors_are_not_recoverable() {
        assert!(!is_recoverable(&"invalid conversation id"));
        assert!(!is_recoverable(&"permission denied"));
        assert!(!is_recoverable(&""));
    }

    #[test]
    fn network_errors_get_connectivity_copy() {
        let msg = user_message(&"fetch failed: dns error");
        assert!(msg.contains("Network connection failed"));

        let msg = user_message(&"connection reset by peer");
        assert!(msg.contains("Network connection failed"));
    }

    #[test]
    fn timeouts_get_timeout_copy() {
        assert_eq!(
            user_message(&"the operation timed out"),
            "The request timed out. Please try again.",
        );
    }

    #[test]
    fn ai_service_errors_get_service_copy() {
        assert_eq!(
            user_message(&"AI service temporarily unavailable"),
            "AI service is temporarily unavailable. Please try again in a moment.",
        );
    }

    #[test]
    fn unknown_errors_fall_back_to_their_own_text() {
        assert_eq!(user_message(&"disk quota exceeded"), "disk quota exceeded");
    }

    #[test]
    fn empty_errors_fall_back_to_generic_copy() {
        assert_eq!(user_message(&""), "An unexpected error occurred");
    }

    #[test]
    fn classification_is_deterministic() {
        let error = "Service Unavailable (503)";
        for _ in 0..10 {
            assert!(is_recoverable(&error));
            assert_eq!(user_message(&error), user_message(&error));
        }
    }
}
