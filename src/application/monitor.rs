//! Status monitor
//!
//! Background re-derivation of reservation statuses. Derived status is
//! a pure function of the stored record and the clock, so nothing is
//! written anywhere — the monitor just sweeps its tracking set on an
//! interval and publishes a `StatusChanged` event whenever a
//! reservation crosses a time boundary. Terminal reservations are
//! dropped from the set after their final transition is reported.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::{DerivedStatus, Reservation};
use crate::notifications::{Event, SharedEventBus};
use crate::shared::shutdown::ShutdownSignal;

/// Configuration for status monitoring
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// How often to re-derive statuses (in seconds)
    pub poll_interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 2,
        }
    }
}

/// Status monitor over an explicit tracking set.
///
/// The set is owned state passed in by the host via `track`/`sync`,
/// never ambient storage, so the monitor works identically under a web
/// UI, a CLI or a test harness.
pub struct StatusMonitor {
    tracked: Arc<DashMap<String, (Reservation, DerivedStatus)>>,
    event_bus: SharedEventBus,
    config: MonitorConfig,
    running: Arc<RwLock<bool>>,
}

impl StatusMonitor {
    pub fn new(event_bus: SharedEventBus) -> Self {
        Self {
            tracked: Arc::new(DashMap::new()),
            event_bus,
            config: MonitorConfig::default(),
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Start tracking a reservation at its current derived status
    pub fn track(&self, reservation: Reservation) {
        let status = reservation.derived_status(Utc::now());
        self.tracked
            .insert(reservation.id.clone(), (reservation, status));
    }

    /// Stop tracking a reservation
    pub fn untrack(&self, id: &str) {
        self.tracked.remove(id);
    }

    /// Replace the tracking set, e.g. after a fresh backend load
    pub fn sync(&self, reservations: Vec<Reservation>) {
        self.tracked.clear();
        for reservation in reservations {
            self.track(reservation);
        }
    }

    /// Snapshot of every tracked reservation's derived status at `now`
    pub fn statuses(&self, now: DateTime<Utc>) -> Vec<(String, DerivedStatus)> {
        self.tracked
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().0.derived_status(now)))
            .collect()
    }

    /// Re-derive every tracked reservation at `now`, publishing a
    /// `StatusChanged` event per observed transition. Reservations that
    /// reached a terminal state are dropped after the event goes out.
    pub fn sweep(&self, now: DateTime<Utc>) {
        let mut finalized: Vec<String> = Vec::new();

        for mut entry in self.tracked.iter_mut() {
            let (reservation, last_status) = entry.value_mut();
            let current = reservation.derived_status(now);
            if current != *last_status {
                debug!(
                    reservation_id = %reservation.id,
                    from = %last_status,
                    to = %current,
                    "Derived status changed"
                );
                self.event_bus.publish(Event::StatusChanged {
                    reservation_id: reservation.id.clone(),
                    from: *last_status,
                    to: current,
                });
                *last_status = current;
            }
            if current.is_terminal() {
                finalized.push(reservation.id.clone());
            }
        }

        for id in finalized {
            self.tracked.remove(&id);
        }
    }

    /// Start the background sweep task
    pub fn start(&self, shutdown: ShutdownSignal) {
        let tracked = self.tracked.clone();
        let event_bus = self.event_bus.clone();
        let config = self.config.clone();
        let running = self.running.clone();

        let monitor = StatusMonitor {
            tracked,
            event_bus,
            config: config.clone(),
            running: running.clone(),
        };

        tokio::spawn(async move {
            {
                let mut r = running.write().await;
                *r = true;
            }

            info!(
                "Status monitor started (poll interval: {}s)",
                config.poll_interval_secs
            );

            let mut interval =
                tokio::time::interval(Duration::from_secs(config.poll_interval_secs));

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        monitor.sweep(Utc::now());
                    }
                    _ = shutdown.notified().wait() => {
                        info!("Status monitor shutting down");
                        break;
                    }
                }
            }

            {
                let mut r = running.write().await;
                *r = false;
            }

            info!("Status monitor stopped");
        });
    }

    /// Check if the background task is running
    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StoredStatus;
    use crate::notifications::create_event_bus;
    use chrono::Duration as ChronoDuration;

    fn sample_reservation(start: DateTime<Utc>, end: DateTime<Utc>) -> Reservation {
        Reservation {
            id: "res-1".into(),
            user_id: "user-1".into(),
            station_id: "st-1".into(),
            connector_id: "c1".into(),
            start_time: start,
            end_time: end,
            stored_status: StoredStatus::Confirmed,
            created_at: Utc::now(),
            final_cost_cents: None,
        }
    }

    #[tokio::test]
    async fn sweep_publishes_each_transition_once() {
        let bus = create_event_bus();
        let mut subscriber = bus.subscribe();
        let monitor = StatusMonitor::new(bus);

        let now = Utc::now();
        monitor.track(sample_reservation(
            now + ChronoDuration::minutes(10),
            now + ChronoDuration::minutes(40),
        ));

        // Still before start: no transition
        monitor.sweep(now + ChronoDuration::minutes(5));

        // Crossed into the window
        monitor.sweep(now + ChronoDuration::minutes(20));
        let msg = subscriber.recv().await.unwrap();
        assert!(matches!(
            msg.event,
            Event::StatusChanged {
                from: DerivedStatus::Confirmed,
                to: DerivedStatus::Active,
                ..
            }
        ));

        // Same point in the window again: no duplicate event
        monitor.sweep(now + ChronoDuration::minutes(21));

        // Past the end
        monitor.sweep(now + ChronoDuration::minutes(45));
        let msg = subscriber.recv().await.unwrap();
        assert!(matches!(
            msg.event,
            Event::StatusChanged {
                from: DerivedStatus::Active,
                to: DerivedStatus::Expired,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn finalized_reservations_are_dropped_after_reporting() {
        let bus = create_event_bus();
        let monitor = StatusMonitor::new(bus);

        let now = Utc::now();
        monitor.track(sample_reservation(
            now + ChronoDuration::minutes(10),
            now + ChronoDuration::minutes(40),
        ));
        assert_eq!(monitor.statuses(now).len(), 1);

        monitor.sweep(now + ChronoDuration::minutes(45));
        assert!(monitor.statuses(now).is_empty());
    }

    #[tokio::test]
    async fn untrack_removes_a_reservation() {
        let bus = create_event_bus();
        let monitor = StatusMonitor::new(bus);
        let now = Utc::now();
        monitor.track(sample_reservation(
            now + ChronoDuration::minutes(10),
            now + ChronoDuration::minutes(40),
        ));
        monitor.untrack("res-1");
        assert!(monitor.statuses(now).is_empty());
    }

    #[tokio::test]
    async fn sync_replaces_the_tracking_set() {
        let bus = create_event_bus();
        let monitor = StatusMonitor::new(bus);
        let now = Utc::now();

        monitor.track(sample_reservation(
            now + ChronoDuration::minutes(10),
            now + ChronoDuration::minutes(40),
        ));

        let mut other = sample_reservation(
            now + ChronoDuration::hours(2),
            now + ChronoDuration::hours(3),
        );
        other.id = "res-2".into();
        monitor.sync(vec![other]);

        let statuses = monitor.statuses(now);
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].0, "res-2");
    }
}
