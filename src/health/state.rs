//! Per-backend health state.
//!
//! # Responsibilities
//! - Keep a bounded history of probe results (oldest evicted first)
//! - Track the consecutive non-healthy count
//! - Decide when an alert may fire (threshold + cooldown debounce)
//!
//! # Design Decisions
//! - Counters reset on any healthy result
//! - The last-alert timestamp also resets on recovery, so a fresh failure
//!   episode alerts as soon as it reaches the threshold again
//! - Mutated only under the monitor's state lock

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::health::result::HealthCheckResult;

/// Bounded number of retained results per backend.
pub const HISTORY_LIMIT: usize = 100;

/// Mutable health state for one backend.
#[derive(Debug)]
pub struct HealthState {
    /// Most recent results, newest at the back.
    pub history: VecDeque<HealthCheckResult>,
    /// Consecutive non-healthy results.
    pub failure_count: u32,
    /// When the last alert for this backend fired.
    pub last_alert_at: Option<Instant>,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(HISTORY_LIMIT),
            failure_count: 0,
            last_alert_at: None,
        }
    }

    /// Latest observed result, if any.
    pub fn latest(&self) -> Option<&HealthCheckResult> {
        self.history.back()
    }

    /// Fold a new result into the state.
    ///
    /// Returns `true` when an alert should fire: the consecutive failure
    /// count has reached `alert_threshold` and no alert fired within
    /// `cooldown`.
    pub fn observe(
        &mut self,
        result: HealthCheckResult,
        alert_threshold: u32,
        cooldown: Duration,
    ) -> bool {
        let healthy = result.status.is_healthy();

        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(result);

        if healthy {
            self.failure_count = 0;
            self.last_alert_at = None;
            return false;
        }

        self.failure_count = self.failure_count.saturating_add(1);
        if self.failure_count < alert_threshold {
            return false;
        }

        let cooled_down = self
            .last_alert_at
            .map_or(true, |at| at.elapsed() >= cooldown);
        if cooled_down {
            self.last_alert_at = Some(Instant::now());
        }
        cooled_down
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::result::HealthCheckResult;
    use crate::health::status::HealthStatus;

    fn healthy(backend: &str) -> HealthCheckResult {
        HealthCheckResult::from_latency(backend, 1, 50, 250, None)
    }

    fn failing(backend: &str) -> HealthCheckResult {
        HealthCheckResult::from_failure(backend, 0, "connection refused".into())
    }

    #[test]
    fn healthy_resets_failure_count() {
        let mut state = HealthState::new();
        state.observe(failing("redis"), 5, Duration::from_secs(60));
        state.observe(failing("redis"), 5, Duration::from_secs(60));
        assert_eq!(state.failure_count, 2);

        state.observe(healthy("redis"), 5, Duration::from_secs(60));
        assert_eq!(state.failure_count, 0);
        assert!(state.last_alert_at.is_none());
    }

    #[test]
    fn alert_fires_once_at_threshold() {
        let mut state = HealthState::new();
        let cooldown = Duration::from_secs(300);
        assert!(!state.observe(failing("redis"), 3, cooldown));
        assert!(!state.observe(failing("redis"), 3, cooldown));
        assert!(state.observe(failing("redis"), 3, cooldown));
        // Continuing failure within cooldown stays silent.
        assert!(!state.observe(failing("redis"), 3, cooldown));
        assert_eq!(state.failure_count, 4);
    }

    #[test]
    fn zero_cooldown_refires_every_qualifying_result() {
        let mut state = HealthState::new();
        assert!(!state.observe(failing("redis"), 2, Duration::ZERO));
        assert!(state.observe(failing("redis"), 2, Duration::ZERO));
        assert!(state.observe(failing("redis"), 2, Duration::ZERO));
    }

    #[test]
    fn history_is_bounded_oldest_first() {
        let mut state = HealthState::new();
        for _ in 0..(HISTORY_LIMIT + 10) {
            state.observe(healthy("redis"), 3, Duration::ZERO);
        }
        assert_eq!(state.history.len(), HISTORY_LIMIT);
    }

    #[test]
    fn new_episode_alerts_after_recovery() {
        let mut state = HealthState::new();
        let cooldown = Duration::from_secs(3600);
        for _ in 0..3 {
            state.observe(failing("redis"), 3, cooldown);
        }
        state.observe(healthy("redis"), 3, cooldown);
        assert!(!state.observe(failing("redis"), 3, cooldown));
        assert!(!state.observe(failing("redis"), 3, cooldown));
        assert!(state.observe(failing("redis"), 3, cooldown));
    }
}
