//! Shutdown coordination for the control loops.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Each long-running loop (health polling, backup schedulers, retention
/// sweep) subscribes and exits after finishing its current round or
/// pipeline once the signal fires. Owners keep the loops' `JoinHandle`s
/// and await them after triggering.
#[derive(Debug)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal. Idempotent.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
