//! Backup subsystem.
//!
//! # Data Flow
//! ```text
//! Scheduler loops (scheduler.rs, one per backend):
//!     Compute next run → sleep → create_backup(backend, Full)
//!
//! Pipeline (pipeline.rs):
//!     Dump adapter → optional gzip stream → streaming sha256 + size
//!
//! Manager (manager.rs):
//!     Owns the index, serializes per-backend execution,
//!     persists on every mutation (index.rs)
//!
//! Retention loop (retention.rs):
//!     Daily sweep of records past the retention window
//! ```
//!
//! # Design Decisions
//! - At most one in-flight backup per backend; concurrent requests rejected
//! - A failed pipeline still yields a (failed) record; partial files removed
//! - The in-memory index mirrors durable storage after every mutation

pub mod index;
pub mod manager;
pub mod pipeline;
pub mod record;
pub mod retention;
pub mod scheduler;

pub use index::{BackupIndexStore, IndexError, JsonIndexStore};
pub use manager::{BackupError, BackupManager};
pub use record::{BackupKind, BackupRecord, BackupStatistics, BackupStatus};
pub use retention::SweepOutcome;
pub use scheduler::ScheduleSpec;
