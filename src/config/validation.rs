//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check backend names are unique and non-empty
//! - Validate value ranges (intervals > 0, warn < critical)
//! - Reject malformed schedule strings at startup
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WardenConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use thiserror::Error;

use crate::backup::scheduler::ScheduleSpec;
use crate::config::schema::WardenConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("backend name must not be empty")]
    EmptyBackendName,

    #[error("duplicate backend name '{0}'")]
    DuplicateBackend(String),

    #[error("backend '{backend}': invalid schedule '{schedule}': {reason}")]
    InvalidSchedule {
        backend: String,
        schedule: String,
        reason: String,
    },

    #[error("backend '{backend}': warn latency {warn_ms}ms must be below critical latency {critical_ms}ms")]
    ThresholdOrder {
        backend: String,
        warn_ms: u64,
        critical_ms: u64,
    },

    #[error("health.{field} must be greater than zero")]
    ZeroHealthValue { field: &'static str },

    #[error("backup.retention_days must be greater than zero")]
    ZeroRetention,

    #[error("backup.sweep_interval_secs must be greater than zero")]
    ZeroSweepInterval,
}

/// Validate a loaded configuration, collecting every error.
pub fn validate_config(config: &WardenConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for backend in &config.backends {
        if backend.name.is_empty() {
            errors.push(ValidationError::EmptyBackendName);
        } else if !seen.insert(backend.name.clone()) {
            errors.push(ValidationError::DuplicateBackend(backend.name.clone()));
        }

        // Malformed schedules are a startup error, never a silent fallback.
        if let Err(reason) = backend.schedule.parse::<ScheduleSpec>() {
            errors.push(ValidationError::InvalidSchedule {
                backend: backend.name.clone(),
                schedule: backend.schedule.clone(),
                reason,
            });
        }

        let warn = backend.warn_threshold_ms();
        let critical = backend.critical_threshold_ms();
        if warn >= critical {
            errors.push(ValidationError::ThresholdOrder {
                backend: backend.name.clone(),
                warn_ms: warn,
                critical_ms: critical,
            });
        }
    }

    if config.health.poll_interval_secs == 0 {
        errors.push(ValidationError::ZeroHealthValue {
            field: "poll_interval_secs",
        });
    }
    if config.health.probe_timeout_secs == 0 {
        errors.push(ValidationError::ZeroHealthValue {
            field: "probe_timeout_secs",
        });
    }
    if config.health.alert_threshold == 0 {
        errors.push(ValidationError::ZeroHealthValue {
            field: "alert_threshold",
        });
    }

    if config.backup.retention_days == 0 {
        errors.push(ValidationError::ZeroRetention);
    }
    if config.backup.sweep_interval_secs == 0 {
        errors.push(ValidationError::ZeroSweepInterval);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::BackendConfig;
    use crate::health::status::BackendKind;

    fn backend(name: &str, schedule: &str) -> BackendConfig {
        BackendConfig {
            name: name.to_string(),
            kind: BackendKind::KeyValue,
            address: "127.0.0.1:6379".to_string(),
            schedule: schedule.to_string(),
            warn_latency_ms: None,
            critical_latency_ms: None,
            dump_command: None,
        }
    }

    #[test]
    fn default_config_is_valid() {
        let mut config = WardenConfig::default();
        config.backends.push(backend("redis", "24h"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn malformed_schedule_is_rejected() {
        let mut config = WardenConfig::default();
        config.backends.push(backend("redis", "whenever"));
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::InvalidSchedule { .. }
        ));
    }

    #[test]
    fn duplicate_backends_are_rejected() {
        let mut config = WardenConfig::default();
        config.backends.push(backend("redis", "24h"));
        config.backends.push(backend("redis", "02:00"));
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::DuplicateBackend(_)));
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let mut config = WardenConfig::default();
        let mut b = backend("redis", "24h");
        b.warn_latency_ms = Some(500);
        b.critical_latency_ms = Some(100);
        config.backends.push(b);
        assert_eq!(validate_config(&config).unwrap_err().len(), 1);
    }

    #[test]
    fn zero_retention_is_rejected() {
        let mut config = WardenConfig::default();
        config.backup.retention_days = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::ZeroRetention));
    }
}
