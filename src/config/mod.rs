//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! TOML file
//!     → loader.rs (read + parse)
//!     → validation.rs (semantic checks, all errors collected)
//!     → schema.rs types handed to the monitor / backup manager
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; a bad config is fatal
//! - Defaults live on the schema types, not scattered at call sites
//! - Malformed backup schedules fail validation instead of falling back

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BackendConfig, BackupConfig, HealthConfig, ObservabilityConfig, WardenConfig,
};
