//! Health monitor.
//!
//! # Responsibilities
//! - Periodically probe all backends and classify results
//! - Maintain per-backend state, debounce alerts, trigger recovery
//! - Serve health reports and windowed service metrics
//!
//! # Design Decisions
//! - Probes within a round run concurrently; the round ends when all return
//! - Any probe exception becomes a critical result; only `stop()` ends the loop
//! - Recovery is fire-and-forget relative to the polling loop

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;

use crate::backend::registry::{BackendHandle, BackendRegistry};
use crate::config::HealthConfig;
use crate::health::alert::{self, AlertEvent, AlertSink};
use crate::health::result::HealthCheckResult;
use crate::health::state::HealthState;
use crate::health::status::HealthStatus;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::resilience::backoff::RetryBackoff;

/// Errors surfaced by monitor API calls.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("unknown backend '{0}'")]
    UnknownBackend(String),

    #[error("no health samples for backend '{backend}' in the requested window")]
    NoData { backend: String },
}

/// Latest health of one backend, as reported to operators.
#[derive(Debug, Clone, Serialize)]
pub struct BackendHealth {
    pub backend: String,
    pub status: HealthStatus,
    pub message: String,
    pub latency_ms: u64,
    pub failure_count: u32,
    pub last_checked: Option<DateTime<Utc>>,
}

/// Fleet-wide health report.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Worst status among all backends.
    pub overall: HealthStatus,
    pub backends: Vec<BackendHealth>,
}

/// Aggregated metrics over a trailing time window.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceMetrics {
    pub backend: String,
    pub checks: usize,
    pub healthy_checks: usize,
    pub availability_pct: f64,
    pub avg_latency_ms: f64,
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    pub failure_count: u32,
}

struct MonitorShared {
    registry: Arc<BackendRegistry>,
    config: HealthConfig,
    states: RwLock<HashMap<String, HealthState>>,
    sinks: RwLock<Vec<Arc<dyn AlertSink>>>,
}

/// Continuously classifies backend health for the whole fleet.
pub struct HealthMonitor {
    shared: Arc<MonitorShared>,
    running: Mutex<Option<(Shutdown, JoinHandle<()>)>>,
}

impl HealthMonitor {
    pub fn new(registry: Arc<BackendRegistry>, config: HealthConfig) -> Self {
        Self {
            shared: Arc::new(MonitorShared {
                registry,
                config,
                states: RwLock::new(HashMap::new()),
                sinks: RwLock::new(Vec::new()),
            }),
            running: Mutex::new(None),
        }
    }

    /// Add an observer invoked on every alert. Multiple sinks are allowed.
    pub fn register_alert_sink(&self, sink: Arc<dyn AlertSink>) {
        self.shared.sinks.write().push(sink);
    }

    /// Begin the polling loop. Warns and does nothing if already running.
    pub fn start(&self) {
        let mut running = self.running.lock();
        if running.is_some() {
            tracing::warn!("Health monitor already running, start ignored");
            return;
        }

        tracing::info!(
            interval_secs = self.shared.config.poll_interval_secs,
            backends = self.shared.registry.len(),
            "Health monitor starting"
        );

        let shutdown = Shutdown::new();
        let rx = shutdown.subscribe();
        let shared = self.shared.clone();
        let handle = tokio::spawn(run_loop(shared, rx));
        *running = Some((shutdown, handle));
    }

    /// Cancel the loop and wait for the in-flight round to finish.
    pub async fn stop(&self) {
        let stopped = self.running.lock().take();
        match stopped {
            Some((shutdown, handle)) => {
                shutdown.trigger();
                if let Err(e) = handle.await {
                    tracing::error!(error = %e, "Health monitor task panicked");
                }
                tracing::info!("Health monitor stopped");
            }
            None => tracing::debug!("Health monitor not running, stop ignored"),
        }
    }

    /// Probe one backend (or all) immediately, outside the schedule, folding
    /// results into state exactly as the loop would.
    pub async fn force_check(
        &self,
        backend: Option<&str>,
    ) -> Result<Vec<HealthCheckResult>, MonitorError> {
        let handles = match backend {
            Some(name) => vec![self
                .shared
                .registry
                .get(name)
                .ok_or_else(|| MonitorError::UnknownBackend(name.to_string()))?],
            None => self.shared.registry.all_backends(),
        };

        Ok(run_round(&self.shared, handles).await)
    }

    /// Latest per-backend health plus the worst-of overall status.
    pub fn health_report(&self) -> HealthReport {
        let states = self.shared.states.read();
        let mut backends: Vec<BackendHealth> = self
            .shared
            .registry
            .all_backends()
            .iter()
            .map(|handle| match states.get(&handle.name).and_then(|s| {
                s.latest().map(|latest| (latest.clone(), s.failure_count))
            }) {
                Some((latest, failure_count)) => BackendHealth {
                    backend: handle.name.clone(),
                    status: latest.status,
                    message: latest.message,
                    latency_ms: latest.latency_ms,
                    failure_count,
                    last_checked: Some(latest.timestamp),
                },
                None => BackendHealth {
                    backend: handle.name.clone(),
                    status: HealthStatus::Unknown,
                    message: "no probe result yet".to_string(),
                    latency_ms: 0,
                    failure_count: 0,
                    last_checked: None,
                },
            })
            .collect();
        backends.sort_by(|a, b| a.backend.cmp(&b.backend));

        let overall = backends
            .iter()
            .map(|b| b.status)
            .max()
            .unwrap_or(HealthStatus::Unknown);

        HealthReport { overall, backends }
    }

    /// Aggregate check counts, availability and latency over the trailing
    /// `window`. Fails with `NoData` when the window holds no samples.
    pub fn service_metrics(
        &self,
        backend: &str,
        window: Duration,
    ) -> Result<ServiceMetrics, MonitorError> {
        if self.shared.registry.get(backend).is_none() {
            return Err(MonitorError::UnknownBackend(backend.to_string()));
        }

        let cutoff = Utc::now()
            - chrono::Duration::from_std(window).unwrap_or_else(|_| chrono::Duration::zero());

        let states = self.shared.states.read();
        let state = states.get(backend);
        let samples: Vec<&HealthCheckResult> = state
            .map(|s| s.history.iter().filter(|r| r.timestamp >= cutoff).collect())
            .unwrap_or_default();

        if samples.is_empty() {
            return Err(MonitorError::NoData {
                backend: backend.to_string(),
            });
        }

        let checks = samples.len();
        let healthy_checks = samples.iter().filter(|r| r.status.is_healthy()).count();
        let latencies: Vec<u64> = samples.iter().map(|r| r.latency_ms).collect();
        let sum: u64 = latencies.iter().sum();

        Ok(ServiceMetrics {
            backend: backend.to_string(),
            checks,
            healthy_checks,
            availability_pct: (healthy_checks as f64 / checks as f64) * 100.0,
            avg_latency_ms: sum as f64 / checks as f64,
            min_latency_ms: latencies.iter().copied().min().unwrap_or(0),
            max_latency_ms: latencies.iter().copied().max().unwrap_or(0),
            failure_count: state.map(|s| s.failure_count).unwrap_or(0),
        })
    }
}

async fn run_loop(shared: Arc<MonitorShared>, mut shutdown: broadcast::Receiver<()>) {
    let interval = Duration::from_secs(shared.config.poll_interval_secs);
    let mut ticker = time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let handles = shared.registry.all_backends();
                run_round(&shared, handles).await;
            }
            _ = shutdown.recv() => {
                tracing::info!("Health monitor received shutdown signal, exiting loop");
                break;
            }
        }
    }
}

/// Probe the given backends concurrently and fold every result into state.
async fn run_round(
    shared: &Arc<MonitorShared>,
    handles: Vec<Arc<BackendHandle>>,
) -> Vec<HealthCheckResult> {
    let probes = handles.iter().map(|h| probe_backend(shared, h.clone()));
    let results = join_all(probes).await;

    for (handle, result) in handles.iter().zip(results.iter()) {
        fold_result(shared, handle, result).await;
    }

    results
}

async fn probe_backend(
    shared: &Arc<MonitorShared>,
    handle: Arc<BackendHandle>,
) -> HealthCheckResult {
    let timeout = Duration::from_secs(shared.config.probe_timeout_secs);
    let start = Instant::now();

    match time::timeout(timeout, handle.probe.probe()).await {
        Ok(Ok(detail)) => {
            let latency_ms = start.elapsed().as_millis() as u64;
            HealthCheckResult::from_latency(
                &handle.name,
                latency_ms,
                handle.warn_latency_ms,
                handle.critical_latency_ms,
                detail,
            )
        }
        Ok(Err(e)) => {
            let latency_ms = start.elapsed().as_millis() as u64;
            tracing::warn!(backend = %handle.name, error = %e, "Probe failed");
            HealthCheckResult::from_failure(&handle.name, latency_ms, e.to_string())
        }
        Err(_) => {
            tracing::warn!(backend = %handle.name, timeout_secs = timeout.as_secs(), "Probe timed out");
            HealthCheckResult::from_failure(
                &handle.name,
                timeout.as_millis() as u64,
                format!("probe timed out after {}s", timeout.as_secs()),
            )
        }
    }
}

async fn fold_result(
    shared: &Arc<MonitorShared>,
    handle: &Arc<BackendHandle>,
    result: &HealthCheckResult,
) {
    metrics::record_backend_health(&result.backend, result.status);
    metrics::record_probe_latency(&result.backend, result.latency_ms);

    let (should_alert, failure_count) = {
        let mut states = shared.states.write();
        let state = states.entry(result.backend.clone()).or_default();
        let fired = state.observe(
            result.clone(),
            shared.config.alert_threshold,
            Duration::from_secs(shared.config.alert_cooldown_secs),
        );
        (fired, state.failure_count)
    };

    if should_alert {
        let event = AlertEvent {
            backend: result.backend.clone(),
            status: result.status,
            message: result.message.clone(),
            failure_count,
            latency_ms: result.latency_ms,
            error: result.error.clone(),
            timestamp: Utc::now(),
        };
        let sinks = shared.sinks.read().clone();
        alert::dispatch(&sinks, &event).await;
    }

    if result.status == HealthStatus::Critical && shared.config.auto_recovery {
        spawn_recovery(handle.clone(), &shared.config);
    }
}

/// Best-effort recovery, detached from the polling loop. Its outcome is
/// logged and never blocks or alters the next round.
fn spawn_recovery(handle: Arc<BackendHandle>, config: &HealthConfig) {
    let max_attempts = config.recovery_max_attempts;
    let backoff = RetryBackoff::from_health_config(config);

    tokio::spawn(async move {
        for attempt in 1..=max_attempts {
            match handle.probe.recover().await {
                Ok(()) => {
                    tracing::info!(backend = %handle.name, attempt, "Recovery succeeded");
                    return;
                }
                Err(e) => {
                    tracing::warn!(backend = %handle.name, attempt, error = %e, "Recovery attempt failed");
                }
            }
            if attempt < max_attempts {
                time::sleep(backoff.delay(attempt)).await;
            }
        }
        tracing::warn!(backend = %handle.name, max_attempts, "Recovery attempts exhausted");
    });
}
