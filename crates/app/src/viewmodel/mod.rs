//! Services behind the terminal screens
//!
//! Each one pairs a core store or state machine with the gateway calls that
//! feed it.

mod appointments;
mod auth;
mod booking;
mod catalog;

pub use appointments::AppointmentsService;
pub use auth::AuthSession;
pub use booking::{BookingWorkflow, SubmitOutcome};
pub use catalog::CatalogService;
