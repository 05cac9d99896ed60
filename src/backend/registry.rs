//! Backend registry.
//!
//! # Responsibilities
//! - Hold one handle per managed backend
//! - Resolve per-backend latency thresholds and schedules from config
//! - Provide lookup and iteration for the control loops

use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::adapter::{DumpAdapter, ProbeAdapter};
use crate::backup::scheduler::ScheduleSpec;
use crate::config::BackendConfig;
use crate::health::status::BackendKind;

/// A single managed backend with its adapters and resolved settings.
pub struct BackendHandle {
    /// Unique backend identifier.
    pub name: String,
    /// Backend kind.
    pub kind: BackendKind,
    /// Latency above which results classify as warning, in milliseconds.
    pub warn_latency_ms: u64,
    /// Latency at or above which results classify as critical, in milliseconds.
    pub critical_latency_ms: u64,
    /// Parsed backup schedule.
    pub schedule: ScheduleSpec,
    /// Probe/recovery adapter.
    pub probe: Arc<dyn ProbeAdapter>,
    /// Dump adapter.
    pub dump: Arc<dyn DumpAdapter>,
}

impl std::fmt::Debug for BackendHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendHandle")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("warn_latency_ms", &self.warn_latency_ms)
            .field("critical_latency_ms", &self.critical_latency_ms)
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}

/// Registry of all managed backends, shared by the health monitor and the
/// backup manager.
#[derive(Debug, Default)]
pub struct BackendRegistry {
    backends: HashMap<String, Arc<BackendHandle>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend from its configuration and adapters.
    ///
    /// Fails if the schedule string does not parse; config validation
    /// normally catches that earlier.
    pub fn register(
        &mut self,
        config: &BackendConfig,
        probe: Arc<dyn ProbeAdapter>,
        dump: Arc<dyn DumpAdapter>,
    ) -> Result<(), String> {
        let schedule: ScheduleSpec = config.schedule.parse()?;
        let handle = BackendHandle {
            name: config.name.clone(),
            kind: config.kind,
            warn_latency_ms: config.warn_threshold_ms(),
            critical_latency_ms: config.critical_threshold_ms(),
            schedule,
            probe,
            dump,
        };
        self.backends.insert(config.name.clone(), Arc::new(handle));
        Ok(())
    }

    /// Look up a backend by name.
    pub fn get(&self, name: &str) -> Option<Arc<BackendHandle>> {
        self.backends.get(name).cloned()
    }

    /// Return all registered backends.
    pub fn all_backends(&self) -> Vec<Arc<BackendHandle>> {
        self.backends.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
