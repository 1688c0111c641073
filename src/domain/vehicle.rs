//! Vehicle profile domain entity

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Physical charging connector standard.
///
/// Closed set; extending it means redeploying every party that
/// enumerates over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectorType {
    Type1,
    Type2,
    Ccs,
    Chademo,
    Tesla,
    GbT,
}

impl ConnectorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type1 => "Type1",
            Self::Type2 => "Type2",
            Self::Ccs => "CCS",
            Self::Chademo => "CHAdeMO",
            Self::Tesla => "Tesla",
            Self::GbT => "GB/T",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Type1" => Some(Self::Type1),
            "Type2" => Some(Self::Type2),
            "CCS" => Some(Self::Ccs),
            "CHAdeMO" => Some(Self::Chademo),
            "Tesla" => Some(Self::Tesla),
            "GB/T" => Some(Self::GbT),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Driver-owned vehicle profile.
///
/// Mutated only through profile edits; the scheduler and estimator
/// treat it as read-only input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub id: String,
    /// Usable battery capacity in kWh (> 0)
    pub battery_capacity_kwh: f64,
    /// Current state of charge, 0–100
    pub current_soc_percent: f64,
    /// Desired state of charge, current–100
    pub target_soc_percent: f64,
    /// Maximum charging power the vehicle accepts, when known
    pub max_accept_power_kw: Option<f64>,
    /// Built-in charging port
    pub primary_connector: ConnectorType,
    /// Adapters the driver carries
    pub adapters: HashSet<ConnectorType>,
}

impl VehicleProfile {
    /// Whether the vehicle can physically plug into a connector of the
    /// given type, either directly or through an adapter.
    pub fn is_compatible_with(&self, connector_type: ConnectorType) -> bool {
        self.primary_connector == connector_type || self.adapters.contains(&connector_type)
    }
}

// ── Tests ──────────────────────────────────────────────────────
