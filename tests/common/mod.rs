//! Shared mocks for integration tests.

// Each test binary uses a subset of these helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fleet_warden::backend::{AdapterError, BackendRegistry, DumpAdapter, ProbeAdapter};
use fleet_warden::backup::{BackupIndexStore, BackupRecord, IndexError};
use fleet_warden::config::BackendConfig;
use fleet_warden::health::{AlertEvent, AlertSink, BackendKind};

/// Probe that replays a script of outcomes, then repeats a fallback.
///
/// `Ok(ms)` sleeps for `ms` before succeeding; `Err(msg)` fails with
/// `msg`.
pub struct ScriptedProbe {
    script: Mutex<VecDeque<Result<u64, String>>>,
    fallback: Result<u64, String>,
    pub recover_calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new(script: Vec<Result<u64, String>>, fallback: Result<u64, String>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback,
            recover_calls: AtomicUsize::new(0),
        })
    }

    /// Always succeeds instantly.
    pub fn healthy() -> Arc<Self> {
        Self::new(Vec::new(), Ok(0))
    }

    /// Always fails to connect.
    pub fn failing(message: &str) -> Arc<Self> {
        Self::new(Vec::new(), Err(message.to_string()))
    }
}

#[async_trait]
impl ProbeAdapter for ScriptedProbe {
    async fn probe(&self) -> Result<Option<serde_json::Value>, AdapterError> {
        let step = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        match step {
            Ok(delay_ms) => {
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Ok(None)
            }
            Err(message) => Err(AdapterError::Unavailable(message)),
        }
    }

    async fn recover(&self) -> Result<(), AdapterError> {
        self.recover_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Dump adapter writing a fixed payload, optionally after a delay.
pub struct MockDump {
    payload: Vec<u8>,
    delay_ms: u64,
}

impl MockDump {
    pub fn new(payload: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            payload: payload.to_vec(),
            delay_ms: 0,
        })
    }

    pub fn slow(payload: &[u8], delay_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            payload: payload.to_vec(),
            delay_ms,
        })
    }
}

#[async_trait]
impl DumpAdapter for MockDump {
    async fn dump(&self, target: &Path) -> Result<u64, AdapterError> {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        tokio::fs::write(target, &self.payload).await?;
        Ok(self.payload.len() as u64)
    }
}

/// Dump adapter that always fails without writing anything.
pub struct FailingDump;

#[async_trait]
impl DumpAdapter for FailingDump {
    async fn dump(&self, _target: &Path) -> Result<u64, AdapterError> {
        Err(AdapterError::Other("dump tool crashed".to_string()))
    }
}

/// In-memory index store counting saves.
#[derive(Default)]
pub struct MemoryIndexStore {
    records: Mutex<Vec<BackupRecord>>,
    pub saves: AtomicUsize,
}

impl MemoryIndexStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn preloaded(records: Vec<BackupRecord>) -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(records),
            saves: AtomicUsize::new(0),
        })
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackupIndexStore for MemoryIndexStore {
    async fn load_all(&self) -> Result<Vec<BackupRecord>, IndexError> {
        Ok(self.records.lock().clone())
    }

    async fn save_all(&self, records: &[BackupRecord]) -> Result<(), IndexError> {
        *self.records.lock() = records.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Index store whose operations always fail, as if the disk were gone.
pub struct BrokenIndexStore;

#[async_trait]
impl BackupIndexStore for BrokenIndexStore {
    async fn load_all(&self) -> Result<Vec<BackupRecord>, IndexError> {
        Err(IndexError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )))
    }

    async fn save_all(&self, _records: &[BackupRecord]) -> Result<(), IndexError> {
        Err(IndexError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )))
    }
}

/// Alert sink collecting every event it receives.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<AlertEvent>>,
}

impl CollectingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl AlertSink for CollectingSink {
    fn name(&self) -> &str {
        "collecting"
    }

    async fn notify(&self, event: &AlertEvent) -> Result<(), AdapterError> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

/// Alert sink that always errors.
pub struct FailingSink;

#[async_trait]
impl AlertSink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    async fn notify(&self, _event: &AlertEvent) -> Result<(), AdapterError> {
        Err(AdapterError::Other("webhook unreachable".to_string()))
    }
}

/// Backend config with warn threshold 0 so every successful probe
/// classifies as warning; useful for deterministic alert tests.
pub fn warning_backend_config(name: &str) -> BackendConfig {
    let mut config = backend_config(name, BackendKind::KeyValue);
    config.warn_latency_ms = Some(0);
    config.critical_latency_ms = Some(u64::MAX);
    config
}

pub fn backend_config(name: &str, kind: BackendKind) -> BackendConfig {
    BackendConfig {
        name: name.to_string(),
        kind,
        address: "127.0.0.1:1".to_string(),
        schedule: "24h".to_string(),
        warn_latency_ms: Some(10_000),
        critical_latency_ms: Some(20_000),
        dump_command: None,
    }
}

/// Build a registry from `(config, probe, dump)` triples.
pub fn registry(
    backends: Vec<(BackendConfig, Arc<dyn ProbeAdapter>, Arc<dyn DumpAdapter>)>,
) -> Arc<BackendRegistry> {
    let mut registry = BackendRegistry::new();
    for (config, probe, dump) in backends {
        registry.register(&config, probe, dump).unwrap();
    }
    Arc::new(registry)
}
