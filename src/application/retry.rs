//! Retry budget and exponential backoff schedule.
//!
//! Pure: maps an attempt number to the delay that precedes it, so the
//! schedule can be checked without sleeping or touching the network.

use std::time::Duration;

/// Attempt budget plus doubling backoff.
///
/// Attempt 1 runs immediately. Attempt `k >= 2` waits
/// `base_delay * 2^(k-2)`: with a 1s base that is 1s, 2s, 4s, 8s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// A budget of at least one attempt.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Single attempt, no backoff.
    #[must_use]
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay to wait before `attempt` (1-based).
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt - 2);
        self.base_delay.saturating_mul(factor)
    }

    /// True when another attempt fits in the budget after `attempt`.
    #[must_use]
    pub const fn allows_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delays preceding attempts `2..=max_attempts`, in order.
    pub fn schedule(&self) -> impl Iterator<Item = Duration> + '_ {
        (2..=self.max_attempts).map(move |attempt| self.delay_before(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(1))
    }
}
