//! Alert events and sink dispatch.
//!
//! # Responsibilities
//! - Define the alert payload handed to registered sinks
//! - Deliver one event to every sink, isolating per-sink failures
//!
//! # Design Decisions
//! - A failing sink is logged and never prevents other sinks from firing
//! - Sinks are async so they can reach webhooks, pagers, etc.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::backend::adapter::AdapterError;
use crate::health::status::HealthStatus;

/// Payload delivered to alert sinks.
#[derive(Debug, Clone, Serialize)]
pub struct AlertEvent {
    /// Backend identifier.
    pub backend: String,
    /// Status that triggered the alert.
    pub status: HealthStatus,
    /// Human-readable summary of the triggering result.
    pub message: String,
    /// Consecutive non-healthy count at the time of the alert.
    pub failure_count: u32,
    /// Latency of the triggering probe in milliseconds.
    pub latency_ms: u64,
    /// Probe error text, if the probe failed.
    pub error: Option<String>,
    /// When the alert fired.
    pub timestamp: DateTime<Utc>,
}

/// Observer notified when a backend crosses the alert threshold.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Sink name used in logs.
    fn name(&self) -> &str {
        "sink"
    }

    async fn notify(&self, event: &AlertEvent) -> Result<(), AdapterError>;
}

/// Deliver `event` to every sink, logging per-sink failures.
pub async fn dispatch(sinks: &[Arc<dyn AlertSink>], event: &AlertEvent) {
    for sink in sinks {
        if let Err(e) = sink.notify(event).await {
            tracing::warn!(
                sink = sink.name(),
                backend = %event.backend,
                error = %e,
                "Alert sink failed"
            );
        }
    }
}

/// Built-in sink that writes alerts to the log.
pub struct LogAlertSink;

#[async_trait]
impl AlertSink for LogAlertSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, event: &AlertEvent) -> Result<(), AdapterError> {
        tracing::error!(
            backend = %event.backend,
            status = %event.status,
            failure_count = event.failure_count,
            latency_ms = event.latency_ms,
            error = event.error.as_deref().unwrap_or("-"),
            "Backend health alert: {}",
            event.message
        );
        Ok(())
    }
}
