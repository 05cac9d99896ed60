//! Metrics collection and exposition.
//!
//! # Metrics
//! - `warden_backend_health` (gauge): 0=unknown, 1=healthy, 2=warning, 3=critical
//! - `warden_probe_latency_ms` (histogram): probe round-trip latency
//! - `warden_backups_total` (counter): backup pipeline runs by backend, outcome
//! - `warden_backup_bytes_total` (counter): artifact bytes produced per backend

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

use crate::health::status::HealthStatus;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the current health classification of a backend.
pub fn record_backend_health(backend: &str, status: HealthStatus) {
    let value = match status {
        HealthStatus::Unknown => 0.0,
        HealthStatus::Healthy => 1.0,
        HealthStatus::Warning => 2.0,
        HealthStatus::Critical => 3.0,
    };
    metrics::gauge!("warden_backend_health", "backend" => backend.to_string()).set(value);
}

/// Record one probe's round-trip latency.
pub fn record_probe_latency(backend: &str, latency_ms: u64) {
    metrics::histogram!("warden_probe_latency_ms", "backend" => backend.to_string())
        .record(latency_ms as f64);
}

/// Record the outcome of one backup pipeline run.
pub fn record_backup_outcome(backend: &str, success: bool, size_bytes: u64) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!(
        "warden_backups_total",
        "backend" => backend.to_string(),
        "outcome" => outcome,
    )
    .increment(1);
    if success {
        metrics::counter!("warden_backup_bytes_total", "backend" => backend.to_string())
            .increment(size_bytes);
    }
}
