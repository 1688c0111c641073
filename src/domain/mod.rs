pub mod error;
pub mod reservation;
pub mod station;
pub mod vehicle;

// Re-export commonly used types
pub use error::{DomainError, DomainResult};
pub use reservation::{DerivedStatus, Reservation, ReservationRequest, StoredStatus};
pub use station::{Connector, ConnectorStatus, Pricing, Station};
pub use vehicle::{ConnectorType, VehicleProfile};
