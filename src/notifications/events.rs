//! Event types published to UI subscribers

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::DerivedStatus;

/// Events emitted by the booking service and the status monitor
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A reservation was created and holds its slot
    ReservationCreated {
        reservation_id: String,
        connector_id: String,
    },
    /// A reservation was cancelled by the user
    ReservationCancelled { reservation_id: String },
    /// The derived status crossed a boundary (clock-driven)
    StatusChanged {
        reservation_id: String,
        from: DerivedStatus,
        to: DerivedStatus,
    },
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ReservationCreated { .. } => "reservation_created",
            Self::ReservationCancelled { .. } => "reservation_cancelled",
            Self::StatusChanged { .. } => "status_changed",
        }
    }

    pub fn reservation_id(&self) -> &str {
        match self {
            Self::ReservationCreated { reservation_id, .. }
            | Self::ReservationCancelled { reservation_id }
            | Self::StatusChanged { reservation_id, .. } => reservation_id,
        }
    }
}

/// An event with its publication timestamp
#[derive(Debug, Clone, Serialize)]
pub struct EventMessage {
    pub timestamp: DateTime<Utc>,
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}
