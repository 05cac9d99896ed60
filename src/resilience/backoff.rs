//! Retry backoff for recovery attempts.

use rand::Rng;
use std::time::Duration;

use crate::config::HealthConfig;

/// Exponential backoff with jitter, used between recovery attempts.
///
/// Attempt numbering starts at 1; the delay doubles per attempt up to the
/// configured cap, plus up to 10% jitter to keep retries for several
/// backends from aligning.
#[derive(Debug, Clone, Copy)]
pub struct RetryBackoff {
    base_ms: u64,
    max_ms: u64,
}

impl RetryBackoff {
    pub fn new(base_ms: u64, max_ms: u64) -> Self {
        Self { base_ms, max_ms }
    }

    pub fn from_health_config(config: &HealthConfig) -> Self {
        Self::new(config.recovery_base_delay_ms, config.recovery_max_delay_ms)
    }

    /// Delay before the next attempt.
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = 2u64.saturating_pow(attempt - 1);
        let capped = self.base_ms.saturating_mul(exponent).min(self.max_ms);

        let jitter_range = capped / 10;
        let jitter = if jitter_range > 0 {
            rand::thread_rng().gen_range(0..jitter_range)
        } else {
            0
        };

        Duration::from_millis(capped + jitter)
    }
}
