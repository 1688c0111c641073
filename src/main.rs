//! Headless reservation agent.
//!
//! Loads a user's reservations from the reservation service, drives the
//! derived-status monitor and logs every transition. Demonstrates that
//! the core runs under any host, not just a UI.
//! Reads configuration from TOML (~/.config/voltnet/reservations.toml).

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info};

use voltnet_reservations::application::MonitorConfig;
use voltnet_reservations::shared::shutdown::{listen_for_shutdown_signals, ShutdownSignal};
use voltnet_reservations::{
    create_event_bus, default_config_path, AppConfig, BookingService, HttpReservationApi,
    StatusMonitor,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("VOLTNET_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    let Some(user_id) = std::env::args().nth(1) else {
        eprintln!("Usage: reservation-agent <user-id>");
        std::process::exit(2);
    };

    info!("Starting VoltNet reservation agent for user {}", user_id);

    // ── Core wiring ────────────────────────────────────────────
    let api = Arc::new(HttpReservationApi::new(
        &config.backend.base_url,
        Duration::from_secs(config.backend.request_timeout_secs),
    )?);
    let event_bus = create_event_bus();
    let booking = BookingService::new(api, event_bus.clone(), config.pricing.clone());

    let monitor = StatusMonitor::new(event_bus.clone()).with_config(MonitorConfig {
        poll_interval_secs: config.monitor.poll_interval_secs,
    });

    // ── Initial sync ───────────────────────────────────────────
    let reservations = booking.load_user_reservations(&user_id).await?;
    info!(
        "Loaded {} reservations from {}",
        reservations.len(),
        config.backend.base_url
    );
    let now = Utc::now();
    for reservation in &reservations {
        info!(
            "  {} connector={} [{} .. {}) status={}",
            reservation.id,
            reservation.connector_id,
            reservation.start_time.to_rfc3339(),
            reservation.end_time.to_rfc3339(),
            reservation.derived_status(now)
        );
    }
    monitor.sync(reservations);

    // ── Run until shutdown ─────────────────────────────────────
    let shutdown = ShutdownSignal::new();
    tokio::spawn(listen_for_shutdown_signals(shutdown.clone()));
    monitor.start(shutdown.clone());

    let mut subscriber = event_bus.subscribe();
    loop {
        tokio::select! {
            maybe_msg = subscriber.recv() => {
                match maybe_msg {
                    Some(msg) => info!(
                        "{} reservation={} at {}",
                        msg.event.event_type(),
                        msg.event.reservation_id(),
                        msg.timestamp.to_rfc3339()
                    ),
                    None => break,
                }
            }
            _ = shutdown.wait() => {
                info!("Reservation agent shutting down");
                break;
            }
        }
    }

    info!("VoltNet reservation agent stopped");
    Ok(())
}
