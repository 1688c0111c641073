//! Slot validator
//!
//! Local, advisory pre-check of a proposed booking. Failing fast here
//! saves a round trip, but the arbitration service stays authoritative:
//! a request that passes validation can still come back as a
//! `SlotConflict` when another driver wins the race.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{DomainError, DomainResult, ReservationRequest, Station, VehicleProfile};

/// Shortest bookable slot, in minutes
pub const MIN_RESERVATION_MINUTES: i64 = 5;

/// Clock-skew tolerance for "start is in the past", in seconds
pub const START_GRACE_SECONDS: i64 = 60;

/// Check a reservation request against local scheduling constraints.
///
/// Checks run in a fixed order and the first failure wins, so the UI
/// always gets the most fundamental problem first.
pub fn validate(
    request: &ReservationRequest,
    station: &Station,
    vehicle: &VehicleProfile,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    if request.duration() < Duration::minutes(MIN_RESERVATION_MINUTES) {
        return Err(DomainError::DurationTooShort {
            min_minutes: MIN_RESERVATION_MINUTES,
        });
    }

    if request.requested_start < now - Duration::seconds(START_GRACE_SECONDS) {
        return Err(DomainError::StartInPast);
    }

    let connector = station
        .connector(&request.connector_id)
        .filter(|c| c.status.is_reservable())
        .ok_or_else(|| DomainError::ConnectorUnavailable {
            station_id: request.station_id.clone(),
            connector_id: request.connector_id.clone(),
        })?;

    if !vehicle.is_compatible_with(connector.connector_type) {
        return Err(DomainError::IncompatibleConnector {
            connector_type: connector.connector_type,
        });
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Connector, ConnectorStatus, ConnectorType, Pricing};
    use std::collections::HashSet;

    fn sample_station() -> Station {
        Station {
            id: "st-1".into(),
            name: "Riverside Hub".into(),
            connectors: vec![
                Connector {
                    id: "c1".into(),
                    connector_type: ConnectorType::Ccs,
                    rated_power_kw: 150.0,
                    status: ConnectorStatus::Available,
                },
                Connector {
                    id: "c2".into(),
                    connector_type: ConnectorType::Chademo,
                    rated_power_kw: 50.0,
                    status: ConnectorStatus::Available,
                },
                Connector {
                    id: "c3".into(),
                    connector_type: ConnectorType::Ccs,
                    rated_power_kw: 150.0,
                    status: ConnectorStatus::Offline,
                },
            ],
            pricing: Pricing {
                price_per_kwh_cents: Some(40),
                price_per_hour_cents: None,
                session_fee_cents: 0,
                currency: "USD".into(),
            },
        }
    }

    fn sample_vehicle() -> VehicleProfile {
        VehicleProfile {
            id: "veh-1".into(),
            battery_capacity_kwh: 60.0,
            current_soc_percent: 25.0,
            target_soc_percent: 80.0,
            max_accept_power_kw: Some(120.0),
            primary_connector: ConnectorType::Ccs,
            adapters: HashSet::new(),
        }
    }

    fn sample_request(
        connector_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ReservationRequest {
        ReservationRequest {
            user_id: "user-1".into(),
            vehicle_id: "veh-1".into(),
            station_id: "st-1".into(),
            connector_id: connector_id.into(),
            requested_start: start,
            requested_end: end,
        }
    }

    #[test]
    fn accepts_a_well_formed_request() {
        let now = Utc::now();
        let req = sample_request(
            "c1",
            now + Duration::minutes(10),
            now + Duration::minutes(40),
        );
        assert!(validate(&req, &sample_station(), &sample_vehicle(), now).is_ok());
    }

    #[test]
    fn rejects_slot_shorter_than_minimum() {
        let now = Utc::now();
        let req = sample_request(
            "c1",
            now + Duration::minutes(10),
            now + Duration::minutes(14),
        );
        assert_eq!(
            validate(&req, &sample_station(), &sample_vehicle(), now),
            Err(DomainError::DurationTooShort { min_minutes: 5 })
        );
    }

    #[test]
    fn accepts_exactly_minimum_duration() {
        let now = Utc::now();
        let req = sample_request(
            "c1",
            now + Duration::minutes(10),
            now + Duration::minutes(15),
        );
        assert!(validate(&req, &sample_station(), &sample_vehicle(), now).is_ok());
    }

    #[test]
    fn start_within_grace_period_is_accepted() {
        let now = Utc::now();
        let req = sample_request("c1", now - Duration::seconds(60), now + Duration::minutes(30));
        assert!(validate(&req, &sample_station(), &sample_vehicle(), now).is_ok());
    }

    #[test]
    fn start_beyond_grace_period_is_rejected() {
        let now = Utc::now();
        let req = sample_request("c1", now - Duration::seconds(61), now + Duration::minutes(30));
        assert_eq!(
            validate(&req, &sample_station(), &sample_vehicle(), now),
            Err(DomainError::StartInPast)
        );
    }

    #[test]
    fn unknown_connector_is_unavailable() {
        let now = Utc::now();
        let req = sample_request(
            "c9",
            now + Duration::minutes(10),
            now + Duration::minutes(40),
        );
        assert_eq!(
            validate(&req, &sample_station(), &sample_vehicle(), now),
            Err(DomainError::ConnectorUnavailable {
                station_id: "st-1".into(),
                connector_id: "c9".into(),
            })
        );
    }

    #[test]
    fn offline_connector_is_unavailable() {
        let now = Utc::now();
        let req = sample_request(
            "c3",
            now + Duration::minutes(10),
            now + Duration::minutes(40),
        );
        assert!(matches!(
            validate(&req, &sample_station(), &sample_vehicle(), now),
            Err(DomainError::ConnectorUnavailable { .. })
        ));
    }

    #[test]
    fn incompatible_connector_type_is_rejected() {
        let now = Utc::now();
        let req = sample_request(
            "c2",
            now + Duration::minutes(10),
            now + Duration::minutes(40),
        );
        assert_eq!(
            validate(&req, &sample_station(), &sample_vehicle(), now),
            Err(DomainError::IncompatibleConnector {
                connector_type: ConnectorType::Chademo
            })
        );
    }

    #[test]
    fn adapter_makes_connector_compatible() {
        let now = Utc::now();
        let mut vehicle = sample_vehicle();
        vehicle.adapters.insert(ConnectorType::Chademo);
        let req = sample_request(
            "c2",
            now + Duration::minutes(10),
            now + Duration::minutes(40),
        );
        assert!(validate(&req, &sample_station(), &vehicle, now).is_ok());
    }

    #[test]
    fn first_failure_wins() {
        // Too short AND in the past AND unknown connector: duration is
        // checked first.
        let now = Utc::now();
        let req = sample_request("c9", now - Duration::hours(1), now - Duration::minutes(58));
        assert_eq!(
            validate(&req, &sample_station(), &sample_vehicle(), now),
            Err(DomainError::DurationTooShort { min_minutes: 5 })
        );
    }
}
