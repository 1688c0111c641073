//! Domain errors
//!
//! Every expected business outcome is a typed error, never a panic.
//! Input errors are caught locally before any network call; contention
//! and finalization errors come back from the reservation service and
//! are surfaced to the caller as-is.

use thiserror::Error;

use super::reservation::Reservation;
use super::vehicle::ConnectorType;

/// Domain-level error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Target state of charge does not exceed the current one
    #[error("target charge {target}% must be above current charge {current}%")]
    InvalidRange { current: f64, target: f64 },

    /// Requested slot is shorter than the minimum reservation duration
    #[error("reservation must last at least {min_minutes} minutes")]
    DurationTooShort { min_minutes: i64 },

    /// Requested start lies before now minus the clock-skew grace period
    #[error("requested start time is in the past")]
    StartInPast,

    /// Connector does not exist at the station, or is offline/in maintenance
    #[error("connector {connector_id} is not available at station {station_id}")]
    ConnectorUnavailable {
        station_id: String,
        connector_id: String,
    },

    /// Vehicle has neither a matching primary connector nor an adapter
    #[error("vehicle cannot charge from a {connector_type} connector")]
    IncompatibleConnector { connector_type: ConnectorType },

    /// Another confirmed reservation overlaps the requested interval
    #[error("slot on connector {connector_id} was just taken")]
    SlotConflict { connector_id: String },

    /// Reservation already reached a terminal state; no transition
    /// possible. Carries the refreshed record when the booking service
    /// fetched one to correct a stale local view.
    #[error("reservation {id} is already finalized")]
    AlreadyFinalized {
        id: String,
        refreshed: Option<Reservation>,
    },

    /// Entity lookup failed
    #[error("not found: {entity} {id}")]
    NotFound { entity: &'static str, id: String },

    /// Malformed input that has no dedicated variant
    #[error("validation: {0}")]
    Validation(String),

    /// Reservation service rejected the call with an HTTP error
    #[error("reservation service error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// Timeout or connection failure talking to the reservation service
    #[error("transport error: {0}")]
    Transport(String),
}

impl DomainError {
    /// Whether this error is likely transient and the operation may
    /// succeed if retried. Only transport failures qualify; a conflict
    /// or validation rejection will not go away on its own.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Transport(_))
    }

    /// Input errors are caught before any network call is made.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidRange { .. }
                | DomainError::DurationTooShort { .. }
                | DomainError::StartInPast
                | DomainError::ConnectorUnavailable { .. }
                | DomainError::IncompatibleConnector { .. }
        )
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── Tests ──────────────────────────────────────────────────────
