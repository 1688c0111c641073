//! # VoltNet Reservation Core
//!
//! Reservation lifecycle engine for the VoltNet EV charging network:
//! charging estimation, slot validation, derived reservation status and
//! the client contract with the reservation service that arbitrates
//! slots.
//!
//! ## Architecture
//!
//! - **domain**: Core entities (vehicle, station, reservation), the
//!   derived-status state machine and typed errors
//! - **application**: Estimator, slot validator, booking service and
//!   the background status monitor
//! - **infrastructure**: Reservation-service clients (HTTP, in-memory)
//! - **notifications**: Broadcast event bus for UI hosts
//! - **shared**: Retry and shutdown helpers
//!
//! Estimation, validation and status derivation are pure functions; all
//! authority over slot exclusivity lives behind the `ReservationApi`
//! seam, and every backend call is timeout-bounded.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod notifications;
pub mod shared;

pub use config::{default_config_path, AppConfig, PricingConfig};

// Re-export the core surface for UI hosts
pub use application::{
    estimate, validate, BookingService, ChargeEstimate, MonitorConfig, StatusMonitor,
};
pub use domain::{
    Connector, ConnectorStatus, ConnectorType, DerivedStatus, DomainError, DomainResult, Pricing,
    Reservation, ReservationRequest, Station, StoredStatus, VehicleProfile,
};
pub use infrastructure::{
    HttpReservationApi, InMemoryReservationApi, NewReservation, ReservationApi,
};
pub use notifications::{create_event_bus, Event, EventBus, EventMessage, SharedEventBus};
pub use shared::shutdown::ShutdownSignal;
