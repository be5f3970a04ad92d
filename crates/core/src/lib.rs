//! MedBook Core Library
//!
//! Domain models, the booking selection state machine, in-memory catalog and
//! appointment stores, configuration and local session storage.

pub mod booking;
pub mod config;
pub mod error;
pub mod invariants;
pub mod models;
pub mod storage;
pub mod store;
pub mod validation;

pub use booking::{
    BookingDraft, BookingFailure, BookingForm, BookingRequest, BookingState, FormField, Selection,
    SubmissionId,
};
pub use config::Config;
pub use error::{Error, Result};
pub use models::*;
pub use storage::{Database, SessionRepository, SessionStore};
pub use store::{AppointmentsStore, Catalog, CatalogStore, EmbeddedHospital};
