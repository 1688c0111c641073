//! Charging estimator
//!
//! Pure computation of energy, duration and advisory cost for a
//! charging session. Safe to recompute on every slider change; no side
//! effects, no clock reads.

use crate::domain::{Connector, DomainError, DomainResult, Pricing, VehicleProfile};

/// Estimate for one charging session
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeEstimate {
    /// Energy to deliver, in kWh
    pub energy_needed_kwh: f64,
    /// Power the session will actually run at, in kW
    pub effective_power_kw: f64,
    /// Wall-clock charge time, rounded up to whole minutes, at least 1
    pub duration_minutes: u32,
    /// Advisory cost in cents, including any session fee
    pub cost_estimate_cents: i64,
    /// Currency of the cost estimate (ISO 4217)
    pub currency: String,
}

/// Compute the estimate for charging `vehicle` at `connector` under the
/// station's `pricing`.
///
/// Cost is advisory only: when the station publishes no per-kWh price,
/// the per-hour price is used if present, and otherwise
/// `default_rate_cents_per_kwh` — the estimate never fails for missing
/// pricing. Duration rounds up so the app never under-promises charge
/// time.
pub fn estimate(
    vehicle: &VehicleProfile,
    connector: &Connector,
    pricing: &Pricing,
    default_rate_cents_per_kwh: i64,
) -> DomainResult<ChargeEstimate> {
    if vehicle.target_soc_percent <= vehicle.current_soc_percent {
        return Err(DomainError::InvalidRange {
            current: vehicle.current_soc_percent,
            target: vehicle.target_soc_percent,
        });
    }
    if vehicle.current_soc_percent < 0.0 || vehicle.target_soc_percent > 100.0 {
        return Err(DomainError::Validation(format!(
            "state of charge out of range: {}% -> {}%",
            vehicle.current_soc_percent, vehicle.target_soc_percent
        )));
    }
    if vehicle.battery_capacity_kwh <= 0.0 {
        return Err(DomainError::Validation(format!(
            "battery capacity must be positive, got {} kWh",
            vehicle.battery_capacity_kwh
        )));
    }
    if connector.rated_power_kw <= 0.0 {
        return Err(DomainError::Validation(format!(
            "connector {} has no usable power rating",
            connector.id
        )));
    }

    let energy_needed_kwh = vehicle.battery_capacity_kwh
        * (vehicle.target_soc_percent - vehicle.current_soc_percent)
        / 100.0;

    // The session runs at whichever side is the bottleneck
    let effective_power_kw = match vehicle.max_accept_power_kw {
        Some(max_accept) if max_accept > 0.0 => connector.rated_power_kw.min(max_accept),
        _ => connector.rated_power_kw,
    };

    let duration_minutes = ((energy_needed_kwh / effective_power_kw * 60.0).ceil() as u32).max(1);

    let energy_cost_cents = match (pricing.price_per_kwh_cents, pricing.price_per_hour_cents) {
        (Some(per_kwh), _) => (energy_needed_kwh * per_kwh as f64).round() as i64,
        (None, Some(per_hour)) => {
            (duration_minutes as f64 / 60.0 * per_hour as f64).round() as i64
        }
        (None, None) => (energy_needed_kwh * default_rate_cents_per_kwh as f64).round() as i64,
    };

    Ok(ChargeEstimate {
        energy_needed_kwh,
        effective_power_kw,
        duration_minutes,
        cost_estimate_cents: energy_cost_cents + pricing.session_fee_cents,
        currency: pricing.currency.clone(),
    })
}

// ── Tests ──────────────────────────────────────────────────────
