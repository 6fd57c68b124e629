//! Transient store error retry logic.
//!
//! Lock contention on a shared database file and node recycling on a remote
//! libSQL server both surface as errors that clear up within moments. Those
//! statements are re-issued with exponential backoff; everything else fails
//! on the first attempt.

use std::time::Duration;

/// Configuration for retry behavior on transient errors.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryConfig {
    /// A config that never retries.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`, capped.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Detect transient errors worth retrying.
///
/// The predicate is narrow on purpose: genuine SQL and constraint errors
/// must never be retried.
pub fn is_transient_error(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("database is locked")
        || msg.contains("unable to acquire shared lock")
        || msg.contains("deletion must be in progress")
}
