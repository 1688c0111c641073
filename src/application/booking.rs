//! Booking service
//!
//! Core façade for the UI portals: validates locally, submits to the
//! reservation service with a client-generated idempotency key, and
//! guards cancellation against finalized reservations. Local state is
//! only ever updated after the backend confirms — a cancel that fails
//! over the wire leaves the displayed reservation untouched.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::estimator::{self, ChargeEstimate};
use crate::application::validator::validate;
use crate::config::PricingConfig;
use crate::domain::{
    DomainError, DomainResult, Reservation, ReservationRequest, Station, VehicleProfile,
};
use crate::infrastructure::backend::{NewReservation, ReservationApi};
use crate::notifications::{Event, SharedEventBus};

/// Booking façade over the reservation service
pub struct BookingService {
    api: Arc<dyn ReservationApi>,
    event_bus: SharedEventBus,
    pricing: PricingConfig,
}

impl BookingService {
    pub fn new(
        api: Arc<dyn ReservationApi>,
        event_bus: SharedEventBus,
        pricing: PricingConfig,
    ) -> Self {
        Self {
            api,
            event_bus,
            pricing,
        }
    }

    /// Estimate a charging session at one of the station's connectors.
    ///
    /// The configured fallback rate fills in when the station publishes
    /// no per-kWh price.
    pub fn estimate_session(
        &self,
        vehicle: &VehicleProfile,
        station: &Station,
        connector_id: &str,
    ) -> DomainResult<ChargeEstimate> {
        let connector =
            station
                .connector(connector_id)
                .ok_or_else(|| DomainError::ConnectorUnavailable {
                    station_id: station.id.clone(),
                    connector_id: connector_id.to_string(),
                })?;
        let estimate = estimator::estimate(
            vehicle,
            connector,
            &station.pricing,
            self.pricing.default_price_per_kwh_cents,
        )?;
        debug!(
            connector_id,
            duration_minutes = estimate.duration_minutes,
            cost = %station.pricing.format_cost(estimate.cost_estimate_cents),
            "Session estimated"
        );
        Ok(estimate)
    }

    /// Validate and submit a reservation request.
    ///
    /// Input errors fail before any network call. A `SlotConflict` from
    /// the arbitration service is an expected outcome and passes
    /// through untouched — the caller re-offers slot discovery instead
    /// of retrying the same interval.
    pub async fn request_reservation(
        &self,
        request: &ReservationRequest,
        station: &Station,
        vehicle: &VehicleProfile,
    ) -> DomainResult<Reservation> {
        validate(request, station, vehicle, Utc::now())?;
        self.submit(request, Uuid::new_v4()).await
    }

    /// Replay a create after a transport failure, reusing the original
    /// idempotency key so the backend returns the existing reservation
    /// instead of double-booking.
    pub async fn retry_reservation(
        &self,
        request: &ReservationRequest,
        idempotency_key: Uuid,
    ) -> DomainResult<Reservation> {
        self.submit(request, idempotency_key).await
    }

    async fn submit(
        &self,
        request: &ReservationRequest,
        idempotency_key: Uuid,
    ) -> DomainResult<Reservation> {
        let created = self
            .api
            .create(NewReservation {
                user_id: request.user_id.clone(),
                vehicle_id: request.vehicle_id.clone(),
                station_id: request.station_id.clone(),
                connector_id: request.connector_id.clone(),
                start_time: request.requested_start,
                end_time: request.requested_end,
                idempotency_key,
            })
            .await?;

        info!(
            reservation_id = %created.id,
            connector_id = %created.connector_id,
            start = %created.start_time,
            "Reservation created"
        );
        self.event_bus.publish(Event::ReservationCreated {
            reservation_id: created.id.clone(),
            connector_id: created.connector_id.clone(),
        });
        Ok(created)
    }

    /// Cancel a reservation.
    ///
    /// Rejected locally with `AlreadyFinalized` when the derived status
    /// already reached a terminal state. When the backend itself
    /// reports the reservation finalized, the local view was stale: the
    /// record is refreshed once and attached to the error, so the
    /// caller can re-render current state alongside it.
    pub async fn cancel_reservation(&self, id: &str) -> DomainResult<Reservation> {
        let existing = self.api.get(id).await?.ok_or_else(|| DomainError::NotFound {
            entity: "reservation",
            id: id.to_string(),
        })?;

        if existing.is_finalized(Utc::now()) {
            return Err(DomainError::AlreadyFinalized {
                id: id.to_string(),
                refreshed: Some(existing),
            });
        }

        match self.api.cancel(id).await {
            Ok(cancelled) => {
                info!(reservation_id = %id, "Reservation cancelled");
                self.event_bus.publish(Event::ReservationCancelled {
                    reservation_id: cancelled.id.clone(),
                });
                Ok(cancelled)
            }
            Err(DomainError::AlreadyFinalized { .. }) => {
                // Stale local view; pull the current record so the
                // error carries the truth instead of the stale copy.
                warn!(reservation_id = %id, "Cancel raced a finalization, refreshing");
                let refreshed = self.api.get(id).await.ok().flatten();
                Err(DomainError::AlreadyFinalized {
                    id: id.to_string(),
                    refreshed,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// All reservations for a user, for rebuilding local state on load
    pub async fn load_user_reservations(&self, user_id: &str) -> DomainResult<Vec<Reservation>> {
        self.api.list_for_user(user_id).await
    }
}

// ── Tests ──────────────────────────────────────────────────────
