//! Station and connector domain entities

use serde::{Deserialize, Serialize};

use super::vehicle::ConnectorType;

/// Connector availability as reported by the backend.
///
/// Authoritative state owned by the reservation service; the core only
/// reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectorStatus {
    Available,
    Busy,
    Offline,
    Maintenance,
}

impl ConnectorStatus {
    /// Whether the connector can take new reservations at all.
    /// Busy connectors stay reservable for future slots.
    pub fn is_reservable(&self) -> bool {
        matches!(self, Self::Available | Self::Busy)
    }
}

impl std::fmt::Display for ConnectorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Available => "Available",
            Self::Busy => "Busy",
            Self::Offline => "Offline",
            Self::Maintenance => "Maintenance",
        };
        write!(f, "{}", s)
    }
}

/// Physical charging socket at a station
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    pub id: String,
    pub connector_type: ConnectorType,
    /// Rated output power in kW (> 0)
    pub rated_power_kw: f64,
    pub status: ConnectorStatus,
}

/// Station pricing. Money is integer cents to keep arithmetic exact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pricing {
    pub price_per_kwh_cents: Option<i64>,
    pub price_per_hour_cents: Option<i64>,
    pub session_fee_cents: i64,
    /// Currency code (ISO 4217)
    pub currency: String,
}

impl Pricing {
    /// Format a cents amount as a human-readable string
    pub fn format_cost(&self, cost_cents: i64) -> String {
        format!("{}.{:02} {}", cost_cents / 100, cost_cents % 100, self.currency)
    }
}

/// Charging station. Immutable from the core's perspective during a
/// single booking flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub connectors: Vec<Connector>,
    pub pricing: Pricing,
}

impl Station {
    /// Look up a connector by id
    pub fn connector(&self, connector_id: &str) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.id == connector_id)
    }
}

// ── Tests ──────────────────────────────────────────────────────
