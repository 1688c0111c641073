//! Reservation domain entity and derived-status state machine
//!
//! The backend persists only intent (`Confirmed`) and explicit terminal
//! events (`Cancelled`, `Completed`). Everything else — a reservation
//! silently becoming active or expiring unclaimed — is a pure function
//! of wall-clock time and is recomputed on every read instead of being
//! stored, so clock skew and stale caches cannot corrupt state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status as persisted by the reservation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredStatus {
    /// Created and holding its slot
    Confirmed,
    /// Charging session finished, reported by the backend
    Completed,
    /// Cancelled by the user
    Cancelled,
}

impl StoredStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Confirmed" => Some(Self::Confirmed),
            "Completed" => Some(Self::Completed),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for StoredStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User-visible status, derived from the stored status plus the clock.
/// `Active` and `Expired` are never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DerivedStatus {
    /// Slot held, start time not reached yet
    Confirmed,
    /// Inside the reserved window, arrival grace still open
    Active,
    /// Session finished (terminal)
    Completed,
    /// Cancelled by the user (terminal)
    Cancelled,
    /// Window passed without the slot being claimed (terminal)
    Expired,
}

impl DerivedStatus {
    /// Terminal states admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Expired)
    }
}

impl std::fmt::Display for DerivedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Confirmed => "Confirmed",
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Expired => "Expired",
        };
        write!(f, "{}", s)
    }
}

/// A reservation record as returned by the reservation service.
///
/// The backend owns the bytes; this type owns the meaning. The interval
/// is half-open: [start_time, end_time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub user_id: String,
    pub station_id: String,
    pub connector_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub stored_status: StoredStatus,
    pub created_at: DateTime<Utc>,
    /// Final session cost in cents, reported by the backend for
    /// completed sessions. Normalized at the client boundary from the
    /// upstream service's assorted cost field spellings.
    pub final_cost_cents: Option<i64>,
}

impl Reservation {
    /// Derive the user-visible status at `now`.
    ///
    /// Stored terminal states win unconditionally; otherwise the clock
    /// decides. Monotonic in `now` for a fixed record.
    pub fn derived_status(&self, now: DateTime<Utc>) -> DerivedStatus {
        match self.stored_status {
            StoredStatus::Cancelled => DerivedStatus::Cancelled,
            StoredStatus::Completed => DerivedStatus::Completed,
            StoredStatus::Confirmed => {
                if now < self.start_time {
                    DerivedStatus::Confirmed
                } else if now < self.end_time {
                    DerivedStatus::Active
                } else {
                    DerivedStatus::Expired
                }
            }
        }
    }

    /// Whether `[start, end)` overlaps this reservation's interval
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end_time && self.start_time < end
    }

    /// Cancellation is allowed only while the derived status is
    /// Confirmed or Active; afterwards the reservation is finalized.
    pub fn can_cancel(&self, now: DateTime<Utc>) -> bool {
        matches!(
            self.derived_status(now),
            DerivedStatus::Confirmed | DerivedStatus::Active
        )
    }

    /// Whether the reservation has reached a terminal state at `now`
    pub fn is_finalized(&self, now: DateTime<Utc>) -> bool {
        self.derived_status(now).is_terminal()
    }
}

// ── Tests ──────────────────────────────────────────────────────
