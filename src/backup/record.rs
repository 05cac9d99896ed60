//! Backup record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// What a backup captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupKind {
    Full,
    Incremental,
    Differential,
}

impl BackupKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackupKind::Full => "full",
            BackupKind::Incremental => "incremental",
            BackupKind::Differential => "differential",
        }
    }
}

/// Lifecycle status of a backup record.
///
/// `Running → Completed | Failed`, and `Completed → Verified` after a
/// successful verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupStatus {
    Running,
    Completed,
    Failed,
    Verified,
}

impl BackupStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BackupStatus::Running => "running",
            BackupStatus::Completed => "completed",
            BackupStatus::Failed => "failed",
            BackupStatus::Verified => "verified",
        }
    }
}

/// A record of one backup pipeline run.
///
/// Size and checksum are set exactly once, when the record transitions to
/// `Completed`; verification compares against them without rewriting them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRecord {
    /// Unique identifier.
    pub id: String,
    /// Backend this backup belongs to.
    pub backend: String,
    /// What the backup captures.
    pub kind: BackupKind,
    /// Current status.
    pub status: BackupStatus,
    /// Artifact location on disk.
    pub artifact_path: PathBuf,
    /// Artifact size in bytes; zero until completed.
    pub size_bytes: u64,
    /// SHA-256 hex digest of the artifact; empty until completed.
    pub checksum: String,
    /// When the pipeline started.
    pub created_at: DateTime<Utc>,
    /// When the pipeline finished, successfully or not.
    pub completed_at: Option<DateTime<Utc>>,
    /// Error text when the pipeline failed.
    pub error: Option<String>,
    /// Optional free-form metadata.
    pub metadata: Option<serde_json::Value>,
}

/// Per-backend aggregate used in [`BackupStatistics`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct BackendBackupStats {
    pub count: u64,
    pub total_size_bytes: u64,
}

/// Aggregate statistics across the whole index.
#[derive(Debug, Clone, Serialize)]
pub struct BackupStatistics {
    pub total_count: u64,
    pub total_size_bytes: u64,
    pub per_backend: HashMap<String, BackendBackupStats>,
    pub per_status: HashMap<String, u64>,
    pub oldest_created_at: Option<DateTime<Utc>>,
    pub newest_created_at: Option<DateTime<Utc>>,
}

impl BackupStatistics {
    /// Compute statistics over a snapshot of records.
    pub fn from_records(records: &[BackupRecord]) -> Self {
        let mut per_backend: HashMap<String, BackendBackupStats> = HashMap::new();
        let mut per_status: HashMap<String, u64> = HashMap::new();
        let mut total_size = 0u64;

        for record in records {
            let entry = per_backend.entry(record.backend.clone()).or_default();
            entry.count += 1;
            entry.total_size_bytes += record.size_bytes;
            total_size += record.size_bytes;
            *per_status
                .entry(record.status.as_str().to_string())
                .or_default() += 1;
        }

        Self {
            total_count: records.len() as u64,
            total_size_bytes: total_size,
            per_backend,
            per_status,
            oldest_created_at: records.iter().map(|r| r.created_at).min(),
            newest_created_at: records.iter().map(|r| r.created_at).max(),
        }
    }
}
