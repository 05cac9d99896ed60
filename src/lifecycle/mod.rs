//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build registry → Start monitor + manager
//!
//! Shutdown (shutdown.rs):
//!     Signal observed → broadcast stop → loops finish current round/pipeline
//!     → callers await quiescence
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - No loop starts a new round or pipeline after observing the stop signal
//! - In-flight work is allowed to finish, never forcibly killed

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
