//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::models::{Appointment, AppointmentStatus, Fee};
use crate::store::Catalog;
use crate::validation::parse_time;

/// Validate that a catalog snapshot is internally consistent
pub fn assert_catalog_invariants(catalog: &Catalog) {
    let mut pairs = HashSet::new();
    for assoc in catalog.associations() {
        debug_assert!(
            pairs.insert((&assoc.hospital_id, &assoc.doctor_id)),
            "Duplicate association for hospital {} doctor {}",
            assoc.hospital_id,
            assoc.doctor_id
        );
        debug_assert!(
            catalog.hospital(&assoc.hospital_id).is_some(),
            "Association references unknown hospital {}",
            assoc.hospital_id
        );
        debug_assert!(
            catalog.doctor(&assoc.doctor_id).is_some(),
            "Association references unknown doctor {}",
            assoc.doctor_id
        );
    }

    for hospital in catalog.hospitals() {
        debug_assert!(
            (0.0..=5.0).contains(&hospital.rating),
            "Hospital {} rating {} out of range",
            hospital.id,
            hospital.rating
        );
    }
}

/// Validate a stored appointment
pub fn assert_appointment_invariants(appointment: &Appointment) {
    debug_assert!(
        appointment.fee >= Fee::ZERO,
        "Appointment {} has negative fee",
        appointment.id
    );
    debug_assert!(
        parse_time(&appointment.time).is_ok(),
        "Appointment {} has malformed time {:?}",
        appointment.id,
        appointment.time
    );
}

/// Validate an appointment produced by a booking
pub fn assert_new_booking(appointment: &Appointment, pinned_fee: Fee) {
    assert_appointment_invariants(appointment);
    debug_assert!(
        appointment.status == AppointmentStatus::Pending,
        "New booking {} has status {} instead of pending",
        appointment.id,
        appointment.status
    );
    debug_assert!(
        appointment.fee == pinned_fee,
        "New booking {} fee {} differs from pinned fee {}",
        appointment.id,
        appointment.fee,
        pinned_fee
    );
}
