//! Reservation-service clients: the HTTP implementation and the
//! in-memory arbitration double used in tests and local development

mod api;
mod http;
mod memory;

pub use api::{NewReservation, ReservationApi};
pub use http::HttpReservationApi;
pub use memory::InMemoryReservationApi;
