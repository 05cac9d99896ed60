//! Fleet warden daemon.
//!
//! Loads the configuration, wires the reference adapters to the registry,
//! starts the health monitor and backup manager, and runs until SIGINT or
//! SIGTERM.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use fleet_warden::adapters::{CommandDumpAdapter, TcpProbeAdapter};
use fleet_warden::backend::BackendRegistry;
use fleet_warden::backup::{BackupManager, JsonIndexStore};
use fleet_warden::config::load_config;
use fleet_warden::health::{HealthMonitor, LogAlertSink};
use fleet_warden::lifecycle::signals;
use fleet_warden::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "fleet-warden")]
#[command(about = "Health monitoring and backup control plane for database fleets", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "warden.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(&args.config)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!(
        config = %args.config.display(),
        backends = config.backends.len(),
        poll_interval_secs = config.health.poll_interval_secs,
        retention_days = config.backup.retention_days,
        "fleet-warden v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut registry = BackendRegistry::new();
    for backend in &config.backends {
        let probe = Arc::new(TcpProbeAdapter::new(backend.address.clone()));
        let dump_command = backend.dump_command.clone().ok_or_else(|| {
            format!("backend '{}' has no dump_command configured", backend.name)
        })?;
        let dump = Arc::new(CommandDumpAdapter::new(dump_command));
        registry
            .register(backend, probe, dump)
            .map_err(|e| format!("backend '{}': {e}", backend.name))?;
    }
    let registry = Arc::new(registry);

    let monitor = HealthMonitor::new(registry.clone(), config.health.clone());
    monitor.register_alert_sink(Arc::new(LogAlertSink));
    if config.health.enabled {
        monitor.start();
    } else {
        tracing::info!("Health monitoring disabled by configuration");
    }

    let index_store = Arc::new(JsonIndexStore::new(
        config.backup.root_dir.join("index.json"),
    ));
    let manager = Arc::new(BackupManager::new(
        registry.clone(),
        config.backup.clone(),
        index_store,
    ));
    manager.initialize().await;

    signals::wait_for_signal().await;
    tracing::info!("Shutting down");

    monitor.stop().await;
    manager.shutdown().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
