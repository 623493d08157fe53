//! OCPP CSMS service host
//!
//! Reads configuration from `$OCPP_CSMS_CONFIG` or the platform config dir
//! (`~/.config/ocpp-csms/config.toml` on Linux), wires the router and store
//! and runs the background services until SIGINT/SIGTERM.

use std::sync::Arc;

use tracing::{info, warn};

use ocpp_csms::application::routing::DataTransferRoutes;
use ocpp_csms::application::services::{
    start_pending_call_sweeper, start_reservation_expiry_task,
};
use ocpp_csms::application::CsmsCore;
use ocpp_csms::config::{config_path, AppConfig};
use ocpp_csms::domain::RepositoryProvider;
use ocpp_csms::infrastructure::InMemoryStore;
use ocpp_csms::support::shutdown::ShutdownCoordinator;
use ocpp_csms::support::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let path = config_path();
    let (config, load_error) = if path.exists() {
        match AppConfig::load(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (AppConfig::default(), Some(e)),
        }
    } else {
        (AppConfig::default(), None)
    };

    init_tracing(&config.logging);
    match load_error {
        Some(e) => warn!(error = %e, "Failed to load config, using defaults"),
        None => info!(path = %path.display(), "Configuration resolved"),
    }

    info!("Starting OCPP CSMS core...");

    // ── Store, router and session plumbing ─────────────────────
    let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryStore::new());
    let core = Arc::new(CsmsCore::new(&config, repos, DataTransferRoutes::new()));
    info!("Router ready");

    // ── Background services ────────────────────────────────────
    let coordinator = ShutdownCoordinator::new(config.shutdown.timeout_secs);
    coordinator.start_signal_listener();

    let expiry = start_reservation_expiry_task(
        core.repos().clone(),
        coordinator.signal(),
        config.reservations.expiry_check_interval_secs,
    );
    let sweeper = start_pending_call_sweeper(
        core.pending().clone(),
        coordinator.signal(),
        config.sessions.pending_call_timeout_secs,
    );

    info!(
        connected = core.registry().count(),
        "CSMS core running, transports attach stations through CsmsCore::connect"
    );

    let clean = coordinator
        .shutdown_with_cleanup(|| async move {
            core.disconnect_all();
            let _ = expiry.await;
            let _ = sweeper.await;
        })
        .await;

    if !clean {
        warn!("Background tasks did not stop in time");
    }
    info!("OCPP CSMS core stopped");
    Ok(())
}
