//! Business logic: estimation, validation, booking, status monitoring

pub mod booking;
pub mod estimator;
pub mod monitor;
pub mod validator;

pub use booking::BookingService;
pub use estimator::{estimate, ChargeEstimate};
pub use monitor::{MonitorConfig, StatusMonitor};
pub use validator::{validate, MIN_RESERVATION_MINUTES, START_GRACE_SECONDS};
