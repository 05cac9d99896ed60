//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (health gauges, latency histograms, backup counters)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; level from config or env
//! - Metric updates are cheap and fire on every folded result
//! - The exporter is optional; recording without it is a no-op

pub mod logging;
pub mod metrics;
