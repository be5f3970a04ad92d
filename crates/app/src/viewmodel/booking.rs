//! Booking workflow for one hospital
//!
//! Wraps the core [`BookingDraft`] state machine and drives the single
//! network call a submission makes. The draft lock is never held across the
//! call; the session identity captured before it is compared afterwards so a
//! response that outlived its session is dropped instead of applied.

use std::sync::{Arc, Mutex, MutexGuard};

use medbook_core::invariants::assert_new_booking;
use medbook_core::{
    Appointment, AppointmentId, AppointmentStatus, AppointmentsStore, BookingDraft,
    BookingFailure, BookingForm, BookingRequest, BookingState, Category, CatalogStore, DoctorId,
    DoctorListing, Error, Fee, FormField, HospitalId, Result, SubmissionId,
};
use medbook_net::ApiGateway;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::auth::AuthSession;
use crate::network::{appointment_from_dto, booking_request_to_dto, gateway_error};

/// How a submission that reached the network ended
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The server created the appointment; it is now in the store
    Booked(Appointment),
    /// The call failed; the draft is in `Failed` with its fields intact
    Failed(Error),
    /// The session ended while the call was in flight; nothing was applied
    Discarded,
}

pub struct BookingWorkflow {
    gateway: Arc<ApiGateway>,
    auth: Arc<AuthSession>,
    catalog: Arc<CatalogStore>,
    appointments: Arc<AppointmentsStore>,
    draft: Mutex<BookingDraft>,
}

impl BookingWorkflow {
    pub fn new(
        hospital_id: HospitalId,
        gateway: Arc<ApiGateway>,
        auth: Arc<AuthSession>,
        catalog: Arc<CatalogStore>,
        appointments: Arc<AppointmentsStore>,
    ) -> Self {
        Self {
            gateway,
            auth,
            catalog,
            appointments,
            draft: Mutex::new(BookingDraft::new(hospital_id)),
        }
    }

    fn draft(&self) -> MutexGuard<'_, BookingDraft> {
        self.draft.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn hospital_id(&self) -> HospitalId {
        self.draft().hospital_id().clone()
    }

    pub fn state(&self) -> BookingState {
        self.draft().state().clone()
    }

    pub fn form(&self) -> BookingForm {
        self.draft().form().clone()
    }

    pub fn pinned_fee(&self) -> Option<Fee> {
        self.draft().pinned_fee()
    }

    pub fn selected_doctor(&self) -> Option<DoctorListing> {
        self.draft().selection().map(|s| s.listing.clone())
    }

    pub fn category(&self) -> Option<Category> {
        self.draft().category()
    }

    pub fn select_category(&self, category: Option<Category>) {
        self.draft().select_category(category);
    }

    /// Doctors at this hospital under the current filter, from the latest
    /// catalog snapshot
    pub fn visible_doctors(&self) -> Vec<DoctorListing> {
        let catalog = self.catalog.snapshot();
        self.draft().visible_doctors(&catalog)
    }

    pub fn select_doctor(&self, listing: DoctorListing) -> Result<()> {
        self.draft().select_doctor(listing)
    }

    /// Select a doctor by id from the current snapshot
    pub fn select_doctor_by_id(&self, doctor_id: &DoctorId) -> Result<DoctorListing> {
        let hospital_id = self.hospital_id();
        let listing = self
            .catalog
            .snapshot()
            .listing(&hospital_id, doctor_id)
            .ok_or_else(|| {
                Error::NotFound(format!("doctor {} at hospital {}", doctor_id, hospital_id))
            })?;
        self.select_doctor(listing.clone())?;
        Ok(listing)
    }

    pub fn update_field(&self, field: FormField, value: impl Into<String>) -> Result<()> {
        self.draft().update_field(field, value)
    }

    /// Slot labels of the selected doctor
    pub fn available_slots(&self) -> Vec<String> {
        self.draft()
            .selection()
            .map(|s| s.listing.doctor.slot_labels())
            .unwrap_or_default()
    }

    pub fn reset(&self) {
        self.draft().reset();
    }

    /// Submit the draft.
    ///
    /// Fails synchronously, with no network call, on a wrong state, a
    /// missing session or invalid fields. Once the request is sent, the result
    /// is reported as a [`SubmitOutcome`].
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let session = self.auth.current();
        let (submission, request) = self.draft().begin_submission(session.as_ref())?;
        let session_id = session.map(|s| s.id);

        let dto = booking_request_to_dto(&request);
        let result = self
            .gateway
            .book_appointment(&dto)
            .await
            .map_err(gateway_error)
            .and_then(appointment_from_dto);

        let mut draft = self.draft();
        match result {
            Ok(appointment) => {
                let appointment = self.settle(appointment, &request);
                // Appending under the session lock keeps a concurrent logout
                // from landing between the identity check and the store update
                let booked = self.auth.if_current(session_id, || {
                    self.appointments.append(appointment.clone());
                    draft.complete(submission, appointment.id.clone());
                });
                if booked.is_none() {
                    self.discard(&mut draft, submission, session_id, Some(&appointment.id));
                    return Ok(SubmitOutcome::Discarded);
                }
                info!(appointment_id = %appointment.id, fee = %appointment.fee, "Appointment booked");
                Ok(SubmitOutcome::Booked(appointment))
            }
            Err(err) => {
                let failed = self.auth.if_current(session_id, || {
                    draft.fail(submission, BookingFailure::from(&err));
                });
                if failed.is_none() {
                    self.discard(&mut draft, submission, session_id, None);
                    return Ok(SubmitOutcome::Discarded);
                }
                warn!(error = %err, "Booking failed");
                Ok(SubmitOutcome::Failed(err))
            }
        }
    }

    fn discard(
        &self,
        draft: &mut BookingDraft,
        submission: SubmissionId,
        requested_by: Option<Uuid>,
        appointment_id: Option<&AppointmentId>,
    ) {
        warn!(
            appointment_id = ?appointment_id.map(|id| id.as_str()),
            ?requested_by,
            current_session = ?self.auth.session_id(),
            "Session changed during booking; discarding response"
        );
        draft.abandon_submission(submission);
    }

    /// Pin the server's echo to what was requested and fill in display labels
    fn settle(&self, mut appointment: Appointment, request: &BookingRequest) -> Appointment {
        if appointment.fee != request.fee {
            warn!(
                server_fee = %appointment.fee,
                pinned_fee = %request.fee,
                "Server echoed a different fee; keeping the pinned fee"
            );
            appointment.fee = request.fee;
        }
        if appointment.status != AppointmentStatus::Pending {
            warn!(status = %appointment.status, "Server echoed a non-pending status for a new booking");
            appointment.status = AppointmentStatus::Pending;
        }

        let catalog = self.catalog.snapshot();
        if let Some(listing) = catalog.listing(&request.hospital_id, &request.doctor_id) {
            appointment
                .doctor_name
                .get_or_insert_with(|| listing.doctor.name.clone());
            appointment
                .specialty
                .get_or_insert_with(|| listing.category.display_name().to_string());
        }
        if let Some(hospital) = catalog.hospital(&request.hospital_id) {
            appointment
                .hospital_name
                .get_or_insert_with(|| hospital.name.clone());
        }

        assert_new_booking(&appointment, request.fee);
        appointment
    }
}
