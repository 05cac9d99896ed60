//! Fleet Warden
//!
//! A control plane that keeps a small fleet of heterogeneous database
//! backends observably healthy and durably backed up, without any backend
//! being aware of the controller.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌─────────────────────────────────────────────────┐
//!                  │                 FLEET WARDEN                    │
//!                  │                                                 │
//!   Probe adapters │   ┌────────────┐        ┌──────────────────┐   │
//!   ◀──────────────┼───│   health   │        │      backup      │───┼──▶ Dump adapters
//!   (per backend)  │   │  monitor   │        │     manager      │   │    (per backend)
//!                  │   └─────┬──────┘        └────────┬─────────┘   │
//!                  │         │                        │             │
//!                  │         ▼                        ▼             │
//!                  │   ┌────────────┐        ┌──────────────────┐   │
//!   Alert sinks ◀──┼───│ per-backend│        │  backup index    │───┼──▶ Index store
//!                  │   │   state    │        │  + artifacts     │   │    (JSON file)
//!                  │   └────────────┘        └──────────────────┘   │
//!                  │                                                 │
//!                  │   ┌─────────────────────────────────────────┐  │
//!                  │   │          Cross-Cutting Concerns          │  │
//!                  │   │  config · lifecycle · observability ·    │  │
//!                  │   │  resilience · backend registry           │  │
//!                  │   └─────────────────────────────────────────┘  │
//!                  └─────────────────────────────────────────────────┘
//! ```
//!
//! The monitor and the manager are independent: both are started once at
//! process initialization and run until explicitly stopped; they never call
//! each other.

// Core subsystems
pub mod backend;
pub mod backup;
pub mod config;
pub mod health;

// Edge adapters
pub mod adapters;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use backend::{BackendHandle, BackendRegistry};
pub use backup::{BackupKind, BackupManager, BackupRecord, JsonIndexStore};
pub use config::{load_config, WardenConfig};
pub use health::{HealthMonitor, HealthStatus};
pub use lifecycle::Shutdown;
