//! Backup manager.
//!
//! # Responsibilities
//! - Own the backup index and keep durable storage in sync
//! - Execute backup pipelines with per-backend mutual exclusion
//! - Serve status, listing, verification, deletion and statistics
//!
//! # Design Decisions
//! - The in-flight flag is the only cross-loop mutual exclusion; the
//!   scheduler and direct API calls race through the same check-and-set
//! - A pipeline failure marks the record failed and removes the partial
//!   artifact; it is not an error to the `create_backup` caller
//! - Index persist failures are logged; the in-memory index stays
//!   authoritative for the running process

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::backend::registry::BackendRegistry;
use crate::backup::index::BackupIndexStore;
use crate::backup::pipeline;
use crate::backup::record::{BackupKind, BackupRecord, BackupStatistics, BackupStatus};
use crate::backup::retention::{self, SweepOutcome};
use crate::backup::scheduler;
use crate::config::BackupConfig;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Errors surfaced by backup API calls.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("backup already in progress for backend '{0}'")]
    Busy(String),

    #[error("unknown backend '{0}'")]
    UnknownBackend(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("artifact error: {0}")]
    Artifact(String),
}

/// Schedules, executes, verifies and prunes backups for the whole fleet.
pub struct BackupManager {
    registry: Arc<BackendRegistry>,
    config: BackupConfig,
    store: Arc<dyn BackupIndexStore>,
    index: RwLock<Vec<BackupRecord>>,
    in_flight: DashMap<String, ()>,
    shutdown: Shutdown,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl BackupManager {
    pub fn new(
        registry: Arc<BackendRegistry>,
        config: BackupConfig,
        store: Arc<dyn BackupIndexStore>,
    ) -> Self {
        Self {
            registry,
            config,
            store,
            index: RwLock::new(Vec::new()),
            in_flight: DashMap::new(),
            shutdown: Shutdown::new(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &BackupConfig {
        &self.config
    }

    /// Load the index from durable storage and start the per-backend
    /// scheduler loops plus the retention loop.
    pub async fn initialize(self: &Arc<Self>) {
        match self.store.load_all().await {
            Ok(records) => {
                tracing::info!(records = records.len(), "Backup index loaded");
                *self.index.write() = records;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load backup index, starting empty");
            }
        }

        let mut tasks = self.tasks.lock();
        for handle in self.registry.all_backends() {
            tasks.push(tokio::spawn(scheduler::run_scheduler(
                self.clone(),
                handle,
                self.shutdown.subscribe(),
            )));
        }
        tasks.push(tokio::spawn(retention::run_retention_loop(
            self.clone(),
            self.shutdown.subscribe(),
        )));
    }

    /// Signal all loops to stop and wait for them; an in-flight pipeline is
    /// allowed to finish.
    pub async fn shutdown(&self) {
        self.shutdown.trigger();
        let tasks: Vec<JoinHandle<()>> = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Backup task panicked");
            }
        }
        tracing::info!("Backup manager stopped");
    }

    /// Run the backup pipeline for `backend` and return the record id.
    ///
    /// The id is returned on pipeline success *and* failure; the record's
    /// status tells them apart. Fails fast with [`BackupError::Busy`] when a
    /// backup is already running for this backend.
    pub async fn create_backup(
        &self,
        backend: &str,
        kind: BackupKind,
    ) -> Result<String, BackupError> {
        let handle = self
            .registry
            .get(backend)
            .ok_or_else(|| BackupError::UnknownBackend(backend.to_string()))?;

        let _guard = self.try_acquire(backend)?;

        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let artifact_path = self.artifact_path(backend, kind, &id);

        let record = BackupRecord {
            id: id.clone(),
            backend: backend.to_string(),
            kind,
            status: BackupStatus::Running,
            artifact_path: artifact_path.clone(),
            size_bytes: 0,
            checksum: String::new(),
            created_at,
            completed_at: None,
            error: None,
            metadata: None,
        };
        self.index.write().push(record);
        self.persist().await;

        tracing::info!(backend, id = %id, kind = kind.as_str(), "Backup pipeline starting");

        let outcome = async {
            pipeline::produce_artifact(
                handle.dump.as_ref(),
                &artifact_path,
                self.config.compression,
            )
            .await?;
            pipeline::digest_artifact(&artifact_path).await
        }
        .await;

        match outcome {
            Ok(digest) => {
                tracing::info!(
                    backend,
                    id = %id,
                    size_bytes = digest.size_bytes,
                    "Backup completed"
                );
                metrics::record_backup_outcome(backend, true, digest.size_bytes);
                self.update_record(&id, |r| {
                    r.status = BackupStatus::Completed;
                    r.size_bytes = digest.size_bytes;
                    r.checksum = digest.checksum.clone();
                    r.completed_at = Some(Utc::now());
                });
            }
            Err(e) => {
                tracing::warn!(backend, id = %id, error = %e, "Backup pipeline failed");
                metrics::record_backup_outcome(backend, false, 0);
                if let Err(rm) = pipeline::remove_artifact(&artifact_path).await {
                    tracing::warn!(
                        path = %artifact_path.display(),
                        error = %rm,
                        "Failed to remove partial artifact"
                    );
                }
                self.update_record(&id, |r| {
                    r.status = BackupStatus::Failed;
                    r.error = Some(e.to_string());
                    r.completed_at = Some(Utc::now());
                });
            }
        }
        self.persist().await;

        Ok(id)
    }

    /// Return the record for `id`.
    pub fn backup_status(&self, id: &str) -> Result<BackupRecord, BackupError> {
        self.find(id)
            .ok_or_else(|| BackupError::NotFound(format!("backup '{id}'")))
    }

    /// Records newest-first, optionally filtered by backend, capped at `limit`.
    pub fn list_backups(&self, backend: Option<&str>, limit: usize) -> Vec<BackupRecord> {
        let mut records: Vec<BackupRecord> = self
            .index
            .read()
            .iter()
            .filter(|r| backend.map_or(true, |b| r.backend == b))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        records
    }

    /// Recompute size and checksum of the stored artifact and compare them
    /// against the recorded values.
    ///
    /// On match the record transitions to `Verified` and is persisted; on
    /// mismatch `Ok(false)` is returned and the record is left untouched.
    pub async fn verify_backup(&self, id: &str) -> Result<bool, BackupError> {
        let record = self.backup_status(id)?;

        let exists = tokio::fs::try_exists(&record.artifact_path)
            .await
            .unwrap_or(false);
        if !exists {
            return Err(BackupError::NotFound(format!("artifact for backup '{id}'")));
        }

        let digest = pipeline::digest_artifact(&record.artifact_path)
            .await
            .map_err(|e| BackupError::Artifact(e.to_string()))?;

        if digest.checksum == record.checksum && digest.size_bytes == record.size_bytes {
            self.update_record(id, |r| r.status = BackupStatus::Verified);
            self.persist().await;
            tracing::info!(id, "Backup verified");
            Ok(true)
        } else {
            tracing::warn!(
                id,
                recorded_checksum = %record.checksum,
                computed_checksum = %digest.checksum,
                recorded_size = record.size_bytes,
                computed_size = digest.size_bytes,
                "Backup verification mismatch"
            );
            Ok(false)
        }
    }

    /// Remove the artifact (tolerating a missing file) and the index entry.
    pub async fn delete_backup(&self, id: &str) -> Result<(), BackupError> {
        let record = self.backup_status(id)?;

        pipeline::remove_artifact(&record.artifact_path)
            .await
            .map_err(|e| BackupError::Artifact(e.to_string()))?;

        self.index.write().retain(|r| r.id != id);
        self.persist().await;
        tracing::info!(id, backend = %record.backend, "Backup deleted");
        Ok(())
    }

    /// Aggregate counts and sizes per backend and per status.
    pub fn statistics(&self) -> BackupStatistics {
        BackupStatistics::from_records(&self.index.read())
    }

    /// Remove every record created strictly before `now - retention_days`.
    ///
    /// Per-record failures are logged and skipped; the index is persisted
    /// once at the end when anything was removed.
    pub async fn sweep_retention(&self) -> SweepOutcome {
        let cutoff = Utc::now() - chrono::Duration::days(i64::from(self.config.retention_days));

        let expired: Vec<BackupRecord> = self
            .index
            .read()
            .iter()
            .filter(|r| retention::is_expired(r, cutoff))
            .cloned()
            .collect();

        let mut outcome = SweepOutcome::default();
        let mut removed_ids = Vec::new();
        for record in expired {
            match pipeline::remove_artifact(&record.artifact_path).await {
                Ok(()) => {
                    outcome.removed += 1;
                    outcome.bytes_freed += record.size_bytes;
                    removed_ids.push(record.id);
                }
                Err(e) => {
                    tracing::warn!(
                        id = %record.id,
                        path = %record.artifact_path.display(),
                        error = %e,
                        "Failed to remove expired artifact, keeping record"
                    );
                }
            }
        }

        if !removed_ids.is_empty() {
            self.index.write().retain(|r| !removed_ids.contains(&r.id));
            self.persist().await;
        }

        outcome
    }

    fn find(&self, id: &str) -> Option<BackupRecord> {
        self.index.read().iter().find(|r| r.id == id).cloned()
    }

    fn update_record(&self, id: &str, mutate: impl FnOnce(&mut BackupRecord)) {
        let mut index = self.index.write();
        if let Some(record) = index.iter_mut().find(|r| r.id == id) {
            mutate(record);
        }
    }

    /// Persist the whole index. A failure leaves the in-memory index
    /// authoritative and is logged, never propagated.
    async fn persist(&self) {
        let snapshot = self.index.read().clone();
        if let Err(e) = self.store.save_all(&snapshot).await {
            tracing::error!(error = %e, "Failed to persist backup index");
        }
    }

    /// Atomically mark a backup in progress for `backend`.
    fn try_acquire(&self, backend: &str) -> Result<InFlightGuard<'_>, BackupError> {
        match self.in_flight.entry(backend.to_string()) {
            Entry::Occupied(_) => Err(BackupError::Busy(backend.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(InFlightGuard {
                    map: &self.in_flight,
                    backend: backend.to_string(),
                })
            }
        }
    }

    fn artifact_path(&self, backend: &str, kind: BackupKind, id: &str) -> PathBuf {
        let short_id: String = id.chars().take(8).collect();
        let stamp = Utc::now().format("%Y%m%d%H%M%S");
        let ext = if self.config.compression {
            "dump.gz"
        } else {
            "dump"
        };
        self.config
            .root_dir
            .join(backend)
            .join(format!("{backend}_{}_{stamp}_{short_id}.{ext}", kind.as_str()))
    }
}

/// Clears the in-flight flag on every exit path.
struct InFlightGuard<'a> {
    map: &'a DashMap<String, ()>,
    backend: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.map.remove(&self.backend);
    }
}
