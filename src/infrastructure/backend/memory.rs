//! In-memory reservation service
//!
//! Reference implementation of the arbitration contract, used in tests
//! and local development. Serializes create calls per connector so the
//! non-overlap invariant holds even under concurrent requests, and
//! replays idempotency keys instead of double-booking.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::api::{NewReservation, ReservationApi};
use crate::domain::{DomainError, DomainResult, Reservation, StoredStatus};

/// In-memory reservation store with per-connector arbitration
#[derive(Default)]
pub struct InMemoryReservationApi {
    reservations: DashMap<String, Reservation>,
    /// One serialization point per (station, connector) pair
    connector_locks: DashMap<String, Arc<Mutex<()>>>,
    /// Idempotency key -> reservation id, for replay on retry
    idempotency: DashMap<Uuid, String>,
}

impl InMemoryReservationApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn connector_key(station_id: &str, connector_id: &str) -> String {
        format!("{}/{}", station_id, connector_id)
    }

    /// Backend-driven completion, as reported once a charging session
    /// finishes in the real world. Not part of the client contract.
    pub fn complete(&self, id: &str, final_cost_cents: i64) -> DomainResult<()> {
        let mut entry = self
            .reservations
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound {
                entity: "reservation",
                id: id.to_string(),
            })?;
        entry.stored_status = StoredStatus::Completed;
        entry.final_cost_cents = Some(final_cost_cents);
        Ok(())
    }
}

#[async_trait]
impl ReservationApi for InMemoryReservationApi {
    async fn create(&self, new: NewReservation) -> DomainResult<Reservation> {
        let key = Self::connector_key(&new.station_id, &new.connector_id);
        let lock = self
            .connector_locks
            .entry(key)
            .or_default()
            .clone();
        let _guard = lock.lock().await;

        // A retried call with a known key returns the original
        // reservation instead of creating a second one.
        if let Some(existing_id) = self.idempotency.get(&new.idempotency_key) {
            if let Some(existing) = self.reservations.get(existing_id.value()) {
                return Ok(existing.clone());
            }
        }

        let conflict = self.reservations.iter().any(|r| {
            r.station_id == new.station_id
                && r.connector_id == new.connector_id
                && r.stored_status == StoredStatus::Confirmed
                && r.overlaps(new.start_time, new.end_time)
        });
        if conflict {
            return Err(DomainError::SlotConflict {
                connector_id: new.connector_id,
            });
        }

        let reservation = Reservation {
            id: Uuid::new_v4().to_string(),
            user_id: new.user_id,
            station_id: new.station_id,
            connector_id: new.connector_id,
            start_time: new.start_time,
            end_time: new.end_time,
            stored_status: StoredStatus::Confirmed,
            created_at: Utc::now(),
            final_cost_cents: None,
        };
        self.idempotency
            .insert(new.idempotency_key, reservation.id.clone());
        self.reservations
            .insert(reservation.id.clone(), reservation.clone());
        Ok(reservation)
    }

    async fn cancel(&self, id: &str) -> DomainResult<Reservation> {
        let mut entry = self
            .reservations
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound {
                entity: "reservation",
                id: id.to_string(),
            })?;

        if !entry.can_cancel(Utc::now()) {
            return Err(DomainError::AlreadyFinalized {
                id: id.to_string(),
                refreshed: None,
            });
        }

        entry.stored_status = StoredStatus::Cancelled;
        Ok(entry.clone())
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(id).map(|r| r.clone()))
    }

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>> {
        let mut out: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.clone())
            .collect();
        out.sort_by_key(|r| r.start_time);
        Ok(out)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_new(
        connector_id: &str,
        start_minutes: i64,
        end_minutes: i64,
        key: Uuid,
    ) -> NewReservation {
        let now = Utc::now();
        NewReservation {
            user_id: "user-1".into(),
            vehicle_id: "veh-1".into(),
            station_id: "st-1".into(),
            connector_id: connector_id.into(),
            start_time: now + Duration::minutes(start_minutes),
            end_time: now + Duration::minutes(end_minutes),
            idempotency_key: key,
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let api = InMemoryReservationApi::new();
        let created = api
            .create(sample_new("c1", 10, 40, Uuid::new_v4()))
            .await
            .unwrap();
        assert_eq!(created.stored_status, StoredStatus::Confirmed);

        let fetched = api.get(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test]
    async fn overlapping_interval_conflicts() {
        let api = InMemoryReservationApi::new();
        api.create(sample_new("c1", 10, 40, Uuid::new_v4()))
            .await
            .unwrap();

        let err = api
            .create(sample_new("c1", 30, 60, Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::SlotConflict {
                connector_id: "c1".into()
            }
        );
    }

    #[tokio::test]
    async fn adjacent_intervals_do_not_conflict() {
        let api = InMemoryReservationApi::new();
        api.create(sample_new("c1", 10, 40, Uuid::new_v4()))
            .await
            .unwrap();
        // [40, 70) touches [10, 40) only at the boundary
        assert!(api
            .create(sample_new("c1", 40, 70, Uuid::new_v4()))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn different_connectors_do_not_conflict() {
        let api = InMemoryReservationApi::new();
        api.create(sample_new("c1", 10, 40, Uuid::new_v4()))
            .await
            .unwrap();
        assert!(api
            .create(sample_new("c2", 10, 40, Uuid::new_v4()))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn cancelled_reservation_frees_the_slot() {
        let api = InMemoryReservationApi::new();
        let first = api
            .create(sample_new("c1", 10, 40, Uuid::new_v4()))
            .await
            .unwrap();
        api.cancel(&first.id).await.unwrap();

        assert!(api
            .create(sample_new("c1", 10, 40, Uuid::new_v4()))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn concurrent_creates_have_exactly_one_winner() {
        let api = Arc::new(InMemoryReservationApi::new());

        let a = api.clone();
        let b = api.clone();
        let (ra, rb) = tokio::join!(
            tokio::spawn(async move { a.create(sample_new("c1", 10, 40, Uuid::new_v4())).await }),
            tokio::spawn(async move { b.create(sample_new("c1", 20, 50, Uuid::new_v4())).await }),
        );

        let results = [ra.unwrap(), rb.unwrap()];
        let winners = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(DomainError::SlotConflict { .. })))
            .count();
        assert_eq!(winners, 1);
        assert_eq!(conflicts, 1);
    }

    #[tokio::test]
    async fn idempotency_key_replay_returns_original() {
        let api = InMemoryReservationApi::new();
        let key = Uuid::new_v4();

        let first = api.create(sample_new("c1", 10, 40, key)).await.unwrap();
        // Simulated client retry after a timeout: same key, same intent
        let second = api.create(sample_new("c1", 10, 40, key)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(api.list_for_user("user-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancel_after_completion_is_rejected() {
        let api = InMemoryReservationApi::new();
        let created = api
            .create(sample_new("c1", 10, 40, Uuid::new_v4()))
            .await
            .unwrap();
        api.complete(&created.id, 1234).unwrap();

        let err = api.cancel(&created.id).await.unwrap_err();
        assert_eq!(
            err,
            DomainError::AlreadyFinalized {
                id: created.id.clone(),
                refreshed: None
            }
        );

        // Stored state untouched by the failed cancel
        let fetched = api.get(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.stored_status, StoredStatus::Completed);
        assert_eq!(fetched.final_cost_cents, Some(1234));
    }

    #[tokio::test]
    async fn cancel_unknown_reservation_is_not_found() {
        let api = InMemoryReservationApi::new();
        assert!(matches!(
            api.cancel("nope").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn list_for_user_is_sorted_by_start() {
        let api = InMemoryReservationApi::new();
        api.create(sample_new("c1", 60, 90, Uuid::new_v4()))
            .await
            .unwrap();
        api.create(sample_new("c2", 10, 40, Uuid::new_v4()))
            .await
            .unwrap();

        let list = api.list_for_user("user-1").await.unwrap();
        assert_eq!(list.len(), 2);
        assert!(list[0].start_time < list[1].start_time);
        assert!(api.list_for_user("someone-else").await.unwrap().is_empty());
    }
}
