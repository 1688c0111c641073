//! Configuration module
//!
//! TOML configuration loaded from `~/.config/voltnet/reservations.toml`
//! (overridable with `VOLTNET_CONFIG`). Every section has defaults so a
//! missing or partial file still produces a working setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Reservation-service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the reservation service
    pub base_url: String,
    /// Per-request timeout; a timed-out call counts as failed
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Advisory pricing defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Fallback rate when a station publishes no per-kWh price
    pub default_price_per_kwh_cents: i64,
    pub currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_price_per_kwh_cents: 35,
            currency: "USD".to_string(),
        }
    }
}

/// Status-monitor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSection {
    /// Seconds between derived-status sweeps
    pub poll_interval_secs: u64,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            poll_interval_secs: 2,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub pricing: PricingConfig,
    pub monitor: MonitorSection,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

/// Default config file location
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("voltnet")
        .join("reservations.toml")
}

// ── Tests ──────────────────────────────────────────────────────
