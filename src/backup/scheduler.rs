//! Backup scheduling.
//!
//! # Responsibilities
//! - Parse per-backend schedule specs from configuration
//! - Compute absolute next-run times
//! - Drive one scheduling loop per backend
//!
//! # Design Decisions
//! - Malformed specs are a parse error; validation rejects them at startup
//! - A failed run (including a busy backend) waits a fixed backoff before
//!   the next run is recomputed; the loop only exits on shutdown

use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;

use crate::backend::registry::BackendHandle;
use crate::backup::manager::BackupManager;
use crate::backup::record::BackupKind;

/// When a backend's scheduled backups run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSpec {
    /// Every day at a fixed UTC time-of-day.
    Daily(NaiveTime),
    /// Every `n` hours, measured from the previous run.
    EveryHours(u32),
}

impl ScheduleSpec {
    /// Absolute time of the next run, strictly after `now`.
    pub fn next_run(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            ScheduleSpec::Daily(time) => {
                let today = now.date_naive().and_time(*time).and_utc();
                if today > now {
                    today
                } else {
                    today + ChronoDuration::days(1)
                }
            }
            ScheduleSpec::EveryHours(hours) => now + ChronoDuration::hours(i64::from(*hours)),
        }
    }
}

impl FromStr for ScheduleSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hours) = s.strip_suffix('h') {
            let hours: u32 = hours
                .parse()
                .map_err(|_| format!("'{s}' is not a whole number of hours"))?;
            if !(1..=168).contains(&hours) {
                return Err(format!("interval must be 1..=168 hours, got {hours}"));
            }
            return Ok(ScheduleSpec::EveryHours(hours));
        }

        NaiveTime::parse_from_str(s, "%H:%M")
            .map(ScheduleSpec::Daily)
            .map_err(|_| format!("'{s}' is neither 'HH:MM' nor '<n>h'"))
    }
}

impl std::fmt::Display for ScheduleSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleSpec::Daily(time) => write!(f, "daily at {}", time.format("%H:%M")),
            ScheduleSpec::EveryHours(hours) => write!(f, "every {hours}h"),
        }
    }
}

/// Scheduling loop for one backend. Runs until shutdown.
pub(crate) async fn run_scheduler(
    manager: Arc<BackupManager>,
    handle: Arc<BackendHandle>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let backoff = Duration::from_secs(manager.config().scheduler_backoff_secs);
    tracing::info!(backend = %handle.name, schedule = %handle.schedule, "Backup scheduler starting");

    loop {
        let now = Utc::now();
        let next = handle.schedule.next_run(now);
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        tracing::debug!(backend = %handle.name, next = %next, "Next scheduled backup");

        tokio::select! {
            _ = time::sleep(wait) => {
                match manager.create_backup(&handle.name, BackupKind::Full).await {
                    Ok(id) => {
                        tracing::info!(backend = %handle.name, id = %id, "Scheduled backup run finished");
                    }
                    Err(e) => {
                        tracing::warn!(
                            backend = %handle.name,
                            error = %e,
                            backoff_secs = backoff.as_secs(),
                            "Scheduled backup failed, backing off"
                        );
                        tokio::select! {
                            _ = time::sleep(backoff) => {}
                            _ = shutdown.recv() => break,
                        }
                    }
                }
            }
            _ = shutdown.recv() => break,
        }
    }

    tracing::info!(backend = %handle.name, "Backup scheduler stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_daily_time_of_day() {
        let spec: ScheduleSpec = "02:30".parse().unwrap();
        assert_eq!(
            spec,
            ScheduleSpec::Daily(NaiveTime::from_hms_opt(2, 30, 0).unwrap())
        );
    }

    #[test]
    fn parses_hour_interval() {
        let spec: ScheduleSpec = "6h".parse().unwrap();
        assert_eq!(spec, ScheduleSpec::EveryHours(6));
    }

    #[test]
    fn rejects_malformed_specs() {
        assert!("whenever".parse::<ScheduleSpec>().is_err());
        assert!("25:00".parse::<ScheduleSpec>().is_err());
        assert!("0h".parse::<ScheduleSpec>().is_err());
        assert!("169h".parse::<ScheduleSpec>().is_err());
        assert!("".parse::<ScheduleSpec>().is_err());
    }

    #[test]
    fn daily_next_run_rolls_over_midnight() {
        let spec: ScheduleSpec = "02:30".parse().unwrap();
        let before = Utc.with_ymd_and_hms(2026, 3, 10, 1, 0, 0).unwrap();
        assert_eq!(
            spec.next_run(before),
            Utc.with_ymd_and_hms(2026, 3, 10, 2, 30, 0).unwrap()
        );

        let after = Utc.with_ymd_and_hms(2026, 3, 10, 3, 0, 0).unwrap();
        assert_eq!(
            spec.next_run(after),
            Utc.with_ymd_and_hms(2026, 3, 11, 2, 30, 0).unwrap()
        );
    }

    #[test]
    fn interval_next_run_is_relative() {
        let spec: ScheduleSpec = "6h".parse().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 1, 0, 0).unwrap();
        assert_eq!(
            spec.next_run(now),
            Utc.with_ymd_and_hms(2026, 3, 10, 7, 0, 0).unwrap()
        );
    }
}
