//! Probe result type and latency classification.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::health::status::HealthStatus;

/// Outcome of one probe against one backend. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResult {
    /// Backend identifier.
    pub backend: String,
    /// Classified status.
    pub status: HealthStatus,
    /// Round-trip latency in milliseconds, measured around the probe call.
    pub latency_ms: u64,
    /// When the probe completed.
    pub timestamp: DateTime<Utc>,
    /// Human-readable summary.
    pub message: String,
    /// Optional structured detail reported by the adapter.
    pub detail: Option<serde_json::Value>,
    /// Error text when the probe failed.
    pub error: Option<String>,
}

impl HealthCheckResult {
    /// Build a result for a probe that connected, classifying its latency
    /// against the backend's thresholds.
    pub fn from_latency(
        backend: &str,
        latency_ms: u64,
        warn_ms: u64,
        critical_ms: u64,
        detail: Option<serde_json::Value>,
    ) -> Self {
        let status = classify_latency(latency_ms, warn_ms, critical_ms);
        let message = match status {
            HealthStatus::Healthy => format!("responding in {latency_ms}ms"),
            HealthStatus::Warning => {
                format!("degraded: {latency_ms}ms (warn threshold {warn_ms}ms)")
            }
            _ => format!("slow: {latency_ms}ms (critical threshold {critical_ms}ms)"),
        };
        Self {
            backend: backend.to_string(),
            status,
            latency_ms,
            timestamp: Utc::now(),
            message,
            detail,
            error: None,
        }
    }

    /// Build a critical result for a probe that could not complete.
    pub fn from_failure(backend: &str, latency_ms: u64, error: String) -> Self {
        Self {
            backend: backend.to_string(),
            status: HealthStatus::Critical,
            latency_ms,
            timestamp: Utc::now(),
            message: format!("probe failed: {error}"),
            detail: None,
            error: Some(error),
        }
    }
}

/// Classify a successful probe's latency.
///
/// Below warn → healthy; at or above warn but below critical → warning;
/// at or above critical → critical.
pub fn classify_latency(latency_ms: u64, warn_ms: u64, critical_ms: u64) -> HealthStatus {
    if latency_ms >= critical_ms {
        HealthStatus::Critical
    } else if latency_ms >= warn_ms {
        HealthStatus::Warning
    } else {
        HealthStatus::Healthy
    }
}
