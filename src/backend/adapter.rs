//! Adapter traits at the backend seam.
//!
//! # Responsibilities
//! - Define the probe/recovery contract used by the health monitor
//! - Define the dump contract used by the backup pipeline
//!
//! # Design Decisions
//! - Latency is measured by the caller around `probe()`, not self-reported
//! - `dump()` returns bytes written explicitly; completion is never inferred
//!   from file timestamps
//! - Recovery errors are logged by the monitor, never propagated

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Error produced by a backend adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Other(String),
}

/// Probe and recovery operations for a single backend.
///
/// `probe` performs a trivial round-trip against the backend and may return
/// structured detail (server version, role, etc.). `recover` makes a
/// best-effort attempt to re-establish the backend connection.
#[async_trait]
pub trait ProbeAdapter: Send + Sync {
    async fn probe(&self) -> Result<Option<serde_json::Value>, AdapterError>;

    async fn recover(&self) -> Result<(), AdapterError>;
}

/// Produces a backup artifact for a single backend.
#[async_trait]
pub trait DumpAdapter: Send + Sync {
    /// Write a backup of the backend to `target`, returning the number of
    /// bytes written.
    async fn dump(&self, target: &Path) -> Result<u64, AdapterError>;
}
