//! Retry policy for sheet fetches, exponential backoff between attempts

use std::time::Duration;

/// Delay before the second attempt
const MIN_BACKOFF_SECS: u64 = 1;
/// Upper bound for any single delay
const MAX_BACKOFF_SECS: u64 = 30;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Delay to wait after the given failed attempt (1-based),
    /// or None when no attempts remain
    pub fn backoff_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        let secs = MIN_BACKOFF_SECS
            .saturating_mul(1u64 << (attempt - 1).min(16))
            .min(MAX_BACKOFF_SECS);
        Some(Duration::from_secs(secs))
    }
}

/// Check if an HTTP status code indicates a transient error
pub fn is_retryable_status(status: u16) -> bool {
    matches!(
        status,
        408 | // Request Timeout
        429 | // Too Many Requests
        500 | // Internal Server Error (sometimes transient)
        502 | // Bad Gateway
        503 | // Service Unavailable
        504   // Gateway Timeout
    )
}

/// Check if a reqwest error is transient
pub fn is_reqwest_error_retryable(err: &reqwest::Error) -> bool {
    err.is_timeout()
        || err.is_connect()
        || err.status().map(|s| is_retryable_status(s.as_u16())).unwrap_or(false)
}
