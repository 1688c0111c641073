//! Reservation request (ephemeral)

use chrono::{DateTime, Duration, Utc};

/// A proposed booking, constructed by the UI, consumed by the slot
/// validator and booking service, and discarded after submission.
/// Never persisted.
#[derive(Debug, Clone)]
pub struct ReservationRequest {
    pub user_id: String,
    pub vehicle_id: String,
    pub station_id: String,
    pub connector_id: String,
    pub requested_start: DateTime<Utc>,
    pub requested_end: DateTime<Utc>,
}

impl ReservationRequest {
    /// Length of the requested slot
    pub fn duration(&self) -> Duration {
        self.requested_end - self.requested_start
    }
}
