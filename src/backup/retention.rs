//! Backup retention sweep.
//!
//! # Responsibilities
//! - Periodically remove backups past the retention window
//! - Tolerate missing artifact files and per-record failures
//!
//! # Design Decisions
//! - The cutoff is exclusive: a record created exactly `retention_days` ago
//!   is retained
//! - The index is persisted once per sweep, and only when something was
//!   removed

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time;

use crate::backup::manager::BackupManager;
use crate::backup::record::BackupRecord;

/// Summary of one retention sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepOutcome {
    /// Records removed from the index.
    pub removed: usize,
    /// Bytes of artifact data freed.
    pub bytes_freed: u64,
}

/// A record is expired when it was created strictly before the cutoff.
pub fn is_expired(record: &BackupRecord, cutoff: DateTime<Utc>) -> bool {
    record.created_at < cutoff
}

/// Retention loop. Runs one sweep per interval until shutdown.
pub(crate) async fn run_retention_loop(
    manager: Arc<BackupManager>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let interval = std::time::Duration::from_secs(manager.config().sweep_interval_secs);
    tracing::info!(
        interval_secs = interval.as_secs(),
        retention_days = manager.config().retention_days,
        "Retention sweep loop starting"
    );

    loop {
        tokio::select! {
            _ = time::sleep(interval) => {
                let outcome = manager.sweep_retention().await;
                if outcome.removed > 0 {
                    tracing::info!(
                        removed = outcome.removed,
                        bytes_freed = outcome.bytes_freed,
                        "Retention sweep removed expired backups"
                    );
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("Retention sweep loop stopped");
                break;
            }
        }
    }
}
