//! Appointment history for the logged-in user

use std::sync::Arc;

use medbook_core::invariants::assert_appointment_invariants;
use medbook_core::{
    Appointment, AppointmentId, AppointmentStatus, AppointmentsStore, Error, Result, UserId,
};
use medbook_net::ApiGateway;
use tracing::{debug, info, instrument, warn};

use super::auth::AuthSession;
use crate::network::{appointment_from_dto, gateway_error};

pub struct AppointmentsService {
    gateway: Arc<ApiGateway>,
    auth: Arc<AuthSession>,
    store: Arc<AppointmentsStore>,
}

impl AppointmentsService {
    pub fn new(
        gateway: Arc<ApiGateway>,
        auth: Arc<AuthSession>,
        store: Arc<AppointmentsStore>,
    ) -> Self {
        Self {
            gateway,
            auth,
            store,
        }
    }

    pub fn store(&self) -> &Arc<AppointmentsStore> {
        &self.store
    }

    pub fn list(&self) -> Vec<Appointment> {
        self.store.list()
    }

    /// Replace the store with the server's list for `user_id`.
    ///
    /// Only the logged-in user's own history may be fetched. A response that
    /// arrives after the session changed is dropped.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn refresh(&self, user_id: &UserId) -> Result<Vec<Appointment>> {
        let session = self.auth.current().ok_or(Error::AuthRequired)?;
        if session.user_id() != user_id {
            return Err(Error::AuthRequired);
        }

        let dtos = self
            .gateway
            .user_appointments(user_id.as_str())
            .await
            .map_err(gateway_error)?;
        let appointments = dtos
            .into_iter()
            .map(appointment_from_dto)
            .collect::<Result<Vec<_>>>()?;

        for appointment in &appointments {
            assert_appointment_invariants(appointment);
        }
        let count = appointments.len();
        let replaced = self
            .auth
            .if_current(Some(session.id), || self.store.replace_all(appointments));
        if replaced.is_none() {
            warn!(
                requested_by = %session.id,
                current_session = ?self.auth.session_id(),
                "Session changed during appointments refresh; discarding response"
            );
        } else {
            info!(count, "Appointments refreshed");
        }
        Ok(self.store.list())
    }

    /// Refresh for whoever is logged in
    pub async fn refresh_current(&self) -> Result<Vec<Appointment>> {
        let session = self.auth.current().ok_or(Error::AuthRequired)?;
        self.refresh(session.user_id()).await
    }

    /// Apply a status change reported elsewhere. Returns false when the
    /// appointment is not in the store.
    pub fn update_status(&self, id: &AppointmentId, status: AppointmentStatus) -> bool {
        let updated = self.store.update_status(id, status);
        if !updated {
            debug!(appointment_id = %id, "Status update for unknown appointment");
        }
        updated
    }
}
