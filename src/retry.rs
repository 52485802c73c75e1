//! Backoff policy for rate-limited detail fetches.
//!
//! The catalog throttles bursty clients with HTTP 429. The resolver absorbs
//! that by re-requesting the identical URL under this policy: capped
//! exponential backoff with jitter, up to a maximum attempt count. Past the
//! ceiling the item fails on its own; a throttled item never aborts the
//! batch.

use std::time::Duration;

use rand::Rng;

/// Default maximum attempts per detail page (including the initial one).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// Base delay for the first retry.
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Cap on the computed backoff delay.
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(32);

/// Maximum jitter added to each delay.
const MAX_JITTER: Duration = Duration::from_millis(500);

/// Capped exponential backoff with jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with custom settings. `max_attempts` is clamped to
    /// at least 1.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// Returns the configured attempt ceiling.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the backoff delay before the next attempt, or `None` when the
    /// ceiling is reached. `attempt` is the 1-indexed attempt that just
    /// failed.
    #[must_use]
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }

        // base * 2^(attempt-1), capped, plus jitter
        let base_ms = self.base_delay.as_millis() as f64;
        let delay_ms = base_ms * 2f64.powi(attempt.saturating_sub(1) as i32);
        let capped_ms = delay_ms.min(self.max_delay.as_millis() as f64);

        let jitter_ms = rand::thread_rng().gen_range(0..=MAX_JITTER.as_millis() as u64);
        Some(Duration::from_millis(capped_ms as u64 + jitter_ms))
    }
}
