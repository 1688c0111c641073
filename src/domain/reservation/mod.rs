//! Reservation entity, request shape and derived-status rules

mod model;
mod request;

pub use model::{DerivedStatus, Reservation, StoredStatus};
pub use request::ReservationRequest;
