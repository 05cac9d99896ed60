//! Health monitoring subsystem.
//!
//! # Data Flow
//! ```text
//! Polling loop (monitor.rs):
//!     Periodic round
//!     → Probe every backend concurrently (timeout applied)
//!     → Classify latency / failures (result.rs)
//!     → Fold into per-backend state (state.rs)
//!     → Fire debounced alerts (alert.rs), spawn recovery
//!
//! State machine (status.rs):
//!     Unknown → {Healthy, Warning, Critical}
//!     Free transitions on every new result
//! ```
//!
//! # Design Decisions
//! - A probe failure becomes a critical result; the loop never dies
//! - Failure counting gives hysteresis; cooldown debounces alerts
//! - Health state is per-backend and snapshot-readable from API calls

pub mod alert;
pub mod monitor;
pub mod result;
pub mod state;
pub mod status;

pub use alert::{AlertEvent, AlertSink, LogAlertSink};
pub use monitor::{HealthMonitor, MonitorError};
pub use result::HealthCheckResult;
pub use status::{BackendKind, HealthStatus};
