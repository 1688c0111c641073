//! Reservation service interface
//!
//! The backend collaborator owns storage and slot arbitration; this
//! trait is the core's contract with it. Create is idempotency-sensitive:
//! the client generates the key once per user intent and reuses it on
//! retry, so a timed-out call replayed over the network can never
//! double-book.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{DomainResult, Reservation};

/// Payload for a create-reservation call
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub user_id: String,
    pub vehicle_id: String,
    pub station_id: String,
    pub connector_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Client-generated, one per user intent, reused across retries
    pub idempotency_key: Uuid,
}

/// Client-side contract with the reservation service.
///
/// `create` either returns the new reservation or fails with
/// `SlotConflict` when the interval overlaps an existing confirmed
/// reservation on the same connector — the single serialization point
/// per connector lives behind this trait.
#[async_trait]
pub trait ReservationApi: Send + Sync {
    /// Create a reservation; subject to slot arbitration
    async fn create(&self, new: NewReservation) -> DomainResult<Reservation>;

    /// Request cancellation; fails with `AlreadyFinalized` on terminal
    /// reservations
    async fn cancel(&self, id: &str) -> DomainResult<Reservation>;

    /// Fetch one reservation
    async fn get(&self, id: &str) -> DomainResult<Option<Reservation>>;

    /// All reservations for a user, used to rebuild local state on load
    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>>;
}
