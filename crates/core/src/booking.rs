//! Booking selection state and its transitions
//!
//! This is the synchronous half of the booking workflow: category filter,
//! doctor selection, form editing and the submission gate. The async half
//! (issuing the request, applying the response) lives with the caller, which
//! drives `begin_submission` / `complete` / `fail` around the network call.
//!
//! The outstanding request is tracked apart from the visible state: `reset`
//! clears the selection but not the in-flight marker, so a second request
//! cannot go out until the first one is settled.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{
    AppointmentId, Category, DoctorId, DoctorListing, Fee, HospitalId, Session, UserId,
};
use crate::store::Catalog;
use crate::validation::{is_valid_email, parse_date, parse_time};

/// Booking form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Name,
    Email,
    Date,
    Time,
}

impl FormField {
    pub fn all() -> &'static [FormField] {
        &[FormField::Name, FormField::Email, FormField::Date, FormField::Time]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Date => "date",
            FormField::Time => "time",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw form input. Invalid values are kept so the user can correct them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub name: String,
    pub email: String,
    pub date: String,
    pub time: String,
}

impl BookingForm {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Date => &self.date,
            FormField::Time => &self.time,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
            FormField::Date => self.date = value,
            FormField::Time => self.time = value,
        }
    }

    pub fn is_field_valid(&self, field: FormField) -> bool {
        let value = self.get(field);
        match field {
            FormField::Name => !value.trim().is_empty(),
            FormField::Email => is_valid_email(value),
            FormField::Date => parse_date(value).is_ok(),
            FormField::Time => parse_time(value).is_ok(),
        }
    }

    /// Fields that are missing or fail validation, in form order
    pub fn invalid_fields(&self) -> Vec<FormField> {
        FormField::all()
            .iter()
            .copied()
            .filter(|f| !self.is_field_valid(*f))
            .collect()
    }
}

/// Why the last submission failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingFailure {
    pub kind: &'static str,
    pub message: String,
}

impl From<&Error> for BookingFailure {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Workflow state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingState {
    /// No doctor selected
    Browsing,
    /// Doctor chosen, form being edited
    DoctorSelected,
    /// Request in flight
    Submitting,
    /// Server returned an appointment
    Completed(AppointmentId),
    /// Last attempt failed; fields are retained for correction
    Failed(BookingFailure),
}

impl BookingState {
    pub fn name(&self) -> &'static str {
        match self {
            BookingState::Browsing => "browsing",
            BookingState::DoctorSelected => "doctor_selected",
            BookingState::Submitting => "submitting",
            BookingState::Completed(_) => "completed",
            BookingState::Failed(_) => "failed",
        }
    }

    /// DoctorSelected, or Failed which behaves like it
    fn is_editable(&self) -> bool {
        matches!(self, BookingState::DoctorSelected | BookingState::Failed(_))
    }
}

/// The doctor picked for booking, with the fee pinned at selection time
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub listing: DoctorListing,
    pub pinned_fee: Fee,
}

/// Everything needed to issue one booking request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub user_id: UserId,
    pub doctor_id: DoctorId,
    pub hospital_id: HospitalId,
    pub date: NaiveDate,
    pub time: String,
    pub fee: Fee,
    pub patient_name: String,
    pub patient_email: String,
}

/// Ticket for one outstanding submission, handed back when it settles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionId(u64);

/// Selection state for one booking attempt at one hospital
#[derive(Debug, Clone)]
pub struct BookingDraft {
    hospital_id: HospitalId,
    state: BookingState,
    category: Option<Category>,
    selection: Option<Selection>,
    form: BookingForm,
    submissions: u64,
    in_flight: Option<SubmissionId>,
}

impl BookingDraft {
    pub fn new(hospital_id: HospitalId) -> Self {
        Self {
            hospital_id,
            state: BookingState::Browsing,
            category: None,
            selection: None,
            form: BookingForm::default(),
            submissions: 0,
            in_flight: None,
        }
    }

    /// The submission awaiting its response, if any
    pub fn in_flight(&self) -> Option<SubmissionId> {
        self.in_flight
    }

    pub fn hospital_id(&self) -> &HospitalId {
        &self.hospital_id
    }

    pub fn state(&self) -> &BookingState {
        &self.state
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn pinned_fee(&self) -> Option<Fee> {
        self.selection.as_ref().map(|s| s.pinned_fee)
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    /// Set or clear the category filter. Always legal; touches nothing else.
    pub fn select_category(&mut self, category: Option<Category>) {
        self.category = category;
    }

    /// Doctors at this hospital passing the current filter
    pub fn visible_doctors(&self, catalog: &Catalog) -> Vec<DoctorListing> {
        catalog.doctors_in_category(&self.hospital_id, self.category)
    }

    /// Pick a doctor. Resets the form and pins the listing's fee.
    pub fn select_doctor(&mut self, listing: DoctorListing) -> Result<()> {
        if !matches!(self.state, BookingState::Browsing) && !self.state.is_editable() {
            return Err(Error::InvalidState(format!(
                "cannot select a doctor while {}",
                self.state.name()
            )));
        }
        if listing.hospital_id != self.hospital_id {
            return Err(Error::InvalidState(format!(
                "doctor {} is listed at hospital {}, not {}",
                listing.doctor.id, listing.hospital_id, self.hospital_id
            )));
        }

        debug!(doctor_id = %listing.doctor.id, fee = %listing.fee, "Doctor selected");
        self.selection = Some(Selection {
            pinned_fee: listing.fee,
            listing,
        });
        self.form = BookingForm::default();
        self.state = BookingState::DoctorSelected;
        Ok(())
    }

    /// Edit a form field. From Failed this clears the failure.
    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) -> Result<()> {
        if !self.state.is_editable() {
            return Err(Error::InvalidState(format!(
                "cannot edit {} while {}",
                field,
                self.state.name()
            )));
        }
        self.form.set(field, value.into());
        self.state = BookingState::DoctorSelected;
        Ok(())
    }

    /// Validate and move to Submitting.
    ///
    /// Checks run in order: workflow state, session, fields. Nothing changes
    /// unless every check passes.
    pub fn begin_submission(
        &mut self,
        session: Option<&Session>,
    ) -> Result<(SubmissionId, BookingRequest)> {
        if self.in_flight.is_some() {
            return Err(Error::AlreadyInProgress);
        }
        match &self.state {
            BookingState::Submitting => return Err(Error::AlreadyInProgress),
            state if !state.is_editable() => {
                return Err(Error::InvalidState(format!(
                    "cannot submit while {}",
                    state.name()
                )))
            }
            _ => {}
        }

        let session = session.ok_or(Error::AuthRequired)?;

        let selection = self
            .selection
            .as_ref()
            .ok_or_else(|| Error::InvalidState("no doctor selected".to_string()))?;

        let invalid = self.form.invalid_fields();
        if !invalid.is_empty() {
            return Err(Error::missing_fields(invalid.iter().map(|f| f.as_str())));
        }

        let request = BookingRequest {
            user_id: session.user_id().clone(),
            doctor_id: selection.listing.doctor.id.clone(),
            hospital_id: self.hospital_id.clone(),
            date: parse_date(&self.form.date)?,
            time: self.form.time.trim().to_string(),
            fee: selection.pinned_fee,
            patient_name: self.form.name.trim().to_string(),
            patient_email: self.form.email.trim().to_string(),
        };

        self.submissions += 1;
        let submission = SubmissionId(self.submissions);
        self.in_flight = Some(submission);
        self.state = BookingState::Submitting;
        Ok((submission, request))
    }

    /// Clear the in-flight marker if `submission` holds it. The visible state
    /// only moves when it is still `Submitting`; after a reset it is left as
    /// the user made it.
    fn settle(&mut self, submission: SubmissionId, next: BookingState) -> bool {
        if self.in_flight != Some(submission) {
            debug!(?submission, "Ignoring settlement of a stale submission");
            return false;
        }
        self.in_flight = None;
        if matches!(self.state, BookingState::Submitting) {
            self.state = next;
        }
        true
    }

    /// Submitting -> Completed
    pub fn complete(&mut self, submission: SubmissionId, appointment_id: AppointmentId) -> bool {
        self.settle(submission, BookingState::Completed(appointment_id))
    }

    /// Submitting -> Failed, fields retained
    pub fn fail(&mut self, submission: SubmissionId, failure: BookingFailure) -> bool {
        self.settle(submission, BookingState::Failed(failure))
    }

    /// Submitting -> DoctorSelected, for a response that no longer applies
    pub fn abandon_submission(&mut self, submission: SubmissionId) -> bool {
        self.settle(submission, BookingState::DoctorSelected)
    }

    /// Back to Browsing with selection and form cleared. Legal from any state;
    /// an outstanding submission stays outstanding.
    pub fn reset(&mut self) {
        self.state = BookingState::Browsing;
        self.category = None;
        self.selection = None;
        self.form = BookingForm::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Association, Doctor, Hospital, UserProfile};

    fn catalog() -> Catalog {
        let hospital = Hospital {
            id: HospitalId::from("H1"),
            name: "Central Hospital".to_string(),
            address: "123 Healthcare Ave".to_string(),
            image: None,
            rating: 4.8,
        };
        let doctor = |id: &str, specialization| Doctor {
            id: DoctorId::from(id),
            name: format!("Dr. {}", id),
            specialization,
            image: None,
            experience_years: 12,
            rating: 4.9,
            fee: Fee::from_units(1000),
            available_slots: Vec::new(),
        };
        Catalog::new(
            vec![hospital],
            vec![doctor("D1", Category::Cardiology), doctor("D2", Category::Neurology)],
            vec![
                Association::new("H1".into(), "D1".into(), Category::Cardiology, Fee::from_units(1500)),
                Association::new("H1".into(), "D2".into(), Category::Neurology, Fee::from_units(2000)),
            ],
        )
    }

    fn session() -> Session {
        Session::new(
            UserProfile {
                id: UserId::from("u1"),
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: None,
            },
            "token".to_string(),
        )
    }

    fn listing(catalog: &Catalog, doctor: &str) -> DoctorListing {
        catalog
            .listing(&HospitalId::from("H1"), &DoctorId::from(doctor))
            .unwrap()
    }

    fn fill_valid(draft: &mut BookingDraft) {
        draft.update_field(FormField::Name, "Jane Doe").unwrap();
        draft.update_field(FormField::Email, "jane@example.com").unwrap();
        draft.update_field(FormField::Date, "2026-11-03").unwrap();
        draft.update_field(FormField::Time, "09:00").unwrap();
    }

    #[test]
    fn test_category_filter_is_idempotent() {
        let catalog = catalog();
        let mut draft = BookingDraft::new("H1".into());

        draft.select_category(Some(Category::Cardiology));
        let once = draft.visible_doctors(&catalog);
        draft.select_category(Some(Category::Cardiology));
        let twice = draft.visible_doctors(&catalog);

        assert_eq!(once, twice);
        assert_eq!(once.len(), 1);
        assert_eq!(once[0].doctor.id, DoctorId::from("D1"));
        assert_eq!(draft.state(), &BookingState::Browsing);

        draft.select_category(None);
        assert_eq!(draft.visible_doctors(&catalog).len(), 2);
    }

    #[test]
    fn test_reselecting_doctor_repins_fee_and_clears_form() {
        let catalog = catalog();
        let mut draft = BookingDraft::new("H1".into());

        draft.select_doctor(listing(&catalog, "D1")).unwrap();
        assert_eq!(draft.pinned_fee(), Some(Fee::from_units(1500)));
        draft.update_field(FormField::Name, "Jane").unwrap();

        draft.select_doctor(listing(&catalog, "D2")).unwrap();
        assert_eq!(draft.pinned_fee(), Some(Fee::from_units(2000)));
        assert_eq!(draft.form(), &BookingForm::default());
        assert_eq!(draft.state(), &BookingState::DoctorSelected);
    }

    #[test]
    fn test_update_field_requires_doctor() {
        let mut draft = BookingDraft::new("H1".into());
        let err = draft.update_field(FormField::Name, "Jane").unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn test_invalid_values_are_retained() {
        let catalog = catalog();
        let mut draft = BookingDraft::new("H1".into());
        draft.select_doctor(listing(&catalog, "D1")).unwrap();

        draft.update_field(FormField::Email, "not-an-email").unwrap();
        assert_eq!(draft.form().email, "not-an-email");
        assert!(!draft.form().is_field_valid(FormField::Email));
    }

    #[test]
    fn test_submission_reports_invalid_fields() {
        let catalog = catalog();
        let mut draft = BookingDraft::new("H1".into());
        draft.select_doctor(listing(&catalog, "D1")).unwrap();
        draft.update_field(FormField::Name, "Jane").unwrap();
        draft.update_field(FormField::Date, "2026-13-01").unwrap();

        let err = draft.begin_submission(Some(&session())).unwrap_err();
        match err {
            Error::Validation { fields, .. } => assert_eq!(fields, vec!["email", "date", "time"]),
            other => panic!("Expected validation error, got {:?}", other),
        }
        assert_eq!(draft.state(), &BookingState::DoctorSelected);
    }

    #[test]
    fn test_submission_without_session_is_auth_required() {
        let catalog = catalog();
        let mut draft = BookingDraft::new("H1".into());
        draft.select_doctor(listing(&catalog, "D1")).unwrap();

        // Even with an empty (invalid) form, auth is checked first
        let err = draft.begin_submission(None).unwrap_err();
        assert!(matches!(err, Error::AuthRequired));

        fill_valid(&mut draft);
        assert!(matches!(draft.begin_submission(None), Err(Error::AuthRequired)));
    }

    #[test]
    fn test_submission_builds_request_with_pinned_fee() {
        let catalog = catalog();
        let mut draft = BookingDraft::new("H1".into());
        draft.select_doctor(listing(&catalog, "D1")).unwrap();
        fill_valid(&mut draft);

        let (_, request) = draft.begin_submission(Some(&session())).unwrap();
        assert_eq!(request.fee, Fee::from_units(1500));
        assert_eq!(request.user_id, UserId::from("u1"));
        assert_eq!(request.doctor_id, DoctorId::from("D1"));
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2026, 11, 3).unwrap());
        assert_eq!(draft.state(), &BookingState::Submitting);

        assert!(matches!(
            draft.begin_submission(Some(&session())),
            Err(Error::AlreadyInProgress)
        ));
    }

    #[test]
    fn test_failed_keeps_fields_and_allows_retry() {
        let catalog = catalog();
        let mut draft = BookingDraft::new("H1".into());
        draft.select_doctor(listing(&catalog, "D1")).unwrap();
        fill_valid(&mut draft);
        let (submission, _) = draft.begin_submission(Some(&session())).unwrap();

        assert!(draft.fail(submission, BookingFailure::from(&Error::Network("timeout".into()))));
        assert!(matches!(draft.state(), BookingState::Failed(f) if f.kind == "network"));
        assert_eq!(draft.form().name, "Jane Doe");

        assert!(draft.begin_submission(Some(&session())).is_ok());
    }

    #[test]
    fn test_completed_rejects_edits_until_reset() {
        let catalog = catalog();
        let mut draft = BookingDraft::new("H1".into());
        draft.select_doctor(listing(&catalog, "D1")).unwrap();
        fill_valid(&mut draft);
        let (submission, _) = draft.begin_submission(Some(&session())).unwrap();
        assert!(draft.complete(submission, AppointmentId::from("a1")));

        assert!(matches!(
            draft.update_field(FormField::Name, "x"),
            Err(Error::InvalidState(_))
        ));
        assert!(matches!(
            draft.begin_submission(Some(&session())),
            Err(Error::InvalidState(_))
        ));

        draft.reset();
        assert_eq!(draft.state(), &BookingState::Browsing);
        assert!(draft.selection().is_none());
        assert_eq!(draft.form(), &BookingForm::default());
    }

    #[test]
    fn test_listing_from_other_hospital_rejected() {
        let catalog = catalog();
        let mut draft = BookingDraft::new("H2".into());
        let err = draft.select_doctor(listing(&catalog, "D1")).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert_eq!(draft.state(), &BookingState::Browsing);
    }

    #[test]
    fn test_reset_keeps_submission_outstanding() {
        let catalog = catalog();
        let mut draft = BookingDraft::new("H1".into());
        draft.select_doctor(listing(&catalog, "D1")).unwrap();
        fill_valid(&mut draft);
        let (first, _) = draft.begin_submission(Some(&session())).unwrap();

        draft.reset();
        assert_eq!(draft.state(), &BookingState::Browsing);
        assert_eq!(draft.in_flight(), Some(first));

        draft.select_doctor(listing(&catalog, "D2")).unwrap();
        fill_valid(&mut draft);
        assert!(matches!(
            draft.begin_submission(Some(&session())),
            Err(Error::AlreadyInProgress)
        ));

        // The first response settles the ticket but leaves the new draft alone
        assert!(draft.complete(first, AppointmentId::from("a1")));
        assert_eq!(draft.state(), &BookingState::DoctorSelected);
        assert_eq!(draft.pinned_fee(), Some(Fee::from_units(2000)));

        let (second, request) = draft.begin_submission(Some(&session())).unwrap();
        assert_ne!(first, second);
        assert_eq!(request.doctor_id, DoctorId::from("D2"));
    }

    #[test]
    fn test_stale_settlement_ignored() {
        let catalog = catalog();
        let mut draft = BookingDraft::new("H1".into());
        draft.select_doctor(listing(&catalog, "D1")).unwrap();
        fill_valid(&mut draft);
        let (first, _) = draft.begin_submission(Some(&session())).unwrap();
        assert!(draft.abandon_submission(first));
        let (second, _) = draft.begin_submission(Some(&session())).unwrap();

        assert!(!draft.complete(first, AppointmentId::from("old")));
        assert_eq!(draft.state(), &BookingState::Submitting);
        assert_eq!(draft.in_flight(), Some(second));
    }
}
