//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the warden.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::health::status::BackendKind;

/// Root configuration for the fleet warden.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WardenConfig {
    /// Managed backend definitions.
    pub backends: Vec<BackendConfig>,

    /// Health monitoring settings.
    pub health: HealthConfig,

    /// Backup scheduling and retention settings.
    pub backup: BackupConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// A single managed backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Unique backend identifier (e.g. "postgresql").
    pub name: String,

    /// Backend kind, used for default latency thresholds.
    pub kind: BackendKind,

    /// Backend address (e.g. "127.0.0.1:5432") for the probe adapter.
    pub address: String,

    /// Backup schedule: `"HH:MM"` for a fixed daily UTC time-of-day, or
    /// `"<n>h"` for a fixed interval in whole hours.
    #[serde(default = "default_schedule")]
    pub schedule: String,

    /// Latency above which the backend is considered degraded, in
    /// milliseconds. Defaults depend on `kind`.
    pub warn_latency_ms: Option<u64>,

    /// Latency at or above which the backend is considered critical, in
    /// milliseconds. Defaults depend on `kind`.
    pub critical_latency_ms: Option<u64>,

    /// Shell command producing a backup artifact; `{path}` is replaced with
    /// the target artifact path. Required by the daemon, optional for
    /// embedders wiring their own dump adapters.
    pub dump_command: Option<String>,
}

fn default_schedule() -> String {
    "24h".to_string()
}

impl BackendConfig {
    /// Warn latency threshold, falling back to the kind default.
    pub fn warn_threshold_ms(&self) -> u64 {
        self.warn_latency_ms.unwrap_or(self.kind.default_warn_ms())
    }

    /// Critical latency threshold, falling back to the kind default.
    pub fn critical_threshold_ms(&self) -> u64 {
        self.critical_latency_ms
            .unwrap_or(self.kind.default_critical_ms())
    }
}

/// Health monitoring configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Enable the health polling loop.
    pub enabled: bool,

    /// Interval between health-check rounds in seconds. A round probes
    /// every configured backend.
    pub poll_interval_secs: u64,

    /// Per-probe timeout in seconds; a timed-out probe counts as a
    /// connection failure.
    pub probe_timeout_secs: u64,

    /// Consecutive non-healthy results before an alert fires.
    pub alert_threshold: u32,

    /// Minimum seconds between two alerts for the same backend.
    pub alert_cooldown_secs: u64,

    /// Attempt backend recovery on critical results.
    pub auto_recovery: bool,

    /// Maximum recovery attempts per critical result.
    pub recovery_max_attempts: u32,

    /// Base delay for recovery backoff in milliseconds.
    pub recovery_base_delay_ms: u64,

    /// Maximum delay for recovery backoff in milliseconds.
    pub recovery_max_delay_ms: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: 30,
            probe_timeout_secs: 5,
            alert_threshold: 3,
            alert_cooldown_secs: 300,
            auto_recovery: true,
            recovery_max_attempts: 3,
            recovery_base_delay_ms: 500,
            recovery_max_delay_ms: 5000,
        }
    }
}

/// Backup execution, scheduling and retention configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Directory under which artifacts are stored, one subdirectory per
    /// backend.
    pub root_dir: PathBuf,

    /// Days a backup is retained before the sweep removes it.
    pub retention_days: u32,

    /// Compress artifacts with gzip while they are produced.
    pub compression: bool,

    /// Interval between retention sweeps in seconds.
    pub sweep_interval_secs: u64,

    /// Fixed wait after a failed scheduled backup before the next run is
    /// recomputed, in seconds.
    pub scheduler_backoff_secs: u64,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./backups"),
            retention_days: 30,
            compression: true,
            sweep_interval_secs: 86_400,
            scheduler_backoff_secs: 300,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
