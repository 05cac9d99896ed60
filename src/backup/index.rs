//! Durable backup index storage.
//!
//! # Responsibilities
//! - Load the full record list at startup
//! - Persist the full record list on every mutation
//!
//! # Design Decisions
//! - Whole-list save keeps the durable file a consistent mirror
//! - Writes go to a temp file then rename, so a crashed save never
//!   truncates the previous index

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::backup::record::BackupRecord;

/// Error from index persistence.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Durable storage for the backup index.
#[async_trait]
pub trait BackupIndexStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<BackupRecord>, IndexError>;

    async fn save_all(&self, records: &[BackupRecord]) -> Result<(), IndexError>;
}

/// JSON-file implementation of the index store.
#[derive(Debug, Clone)]
pub struct JsonIndexStore {
    path: PathBuf,
}

impl JsonIndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BackupIndexStore for JsonIndexStore {
    async fn load_all(&self) -> Result<Vec<BackupRecord>, IndexError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_all(&self, records: &[BackupRecord]) -> Result<(), IndexError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
