//! External concerns: the reservation-service boundary

pub mod backend;

pub use backend::{HttpReservationApi, InMemoryReservationApi, NewReservation, ReservationApi};
