//! Backend abstraction subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     config backends + injected adapters
//!     → registry.rs (name → BackendHandle map)
//!
//! Runtime:
//!     Health monitor → handle.probe (adapter.rs traits)
//!     Backup manager → handle.dump
//! ```
//!
//! # Design Decisions
//! - The controller never speaks a backend's wire protocol; adapters do
//! - One handle per backend, shared by both control loops via Arc
//! - Adapter failures are values, never panics

pub mod adapter;
pub mod registry;

pub use adapter::{AdapterError, DumpAdapter, ProbeAdapter};
pub use registry::{BackendHandle, BackendRegistry};
