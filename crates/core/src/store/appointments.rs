//! The authenticated user's appointments

use std::sync::RwLock;

use tracing::{debug, instrument};

use super::{read, write};
use crate::models::{Appointment, AppointmentId, AppointmentStatus};

/// Holds the current user's appointments in server order
#[derive(Debug, Default)]
pub struct AppointmentsStore {
    entries: RwLock<Vec<Appointment>>,
}

impl AppointmentsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list with a freshly fetched one, order preserved
    #[instrument(skip(self, appointments), fields(count = appointments.len()))]
    pub fn replace_all(&self, appointments: Vec<Appointment>) {
        *write(&self.entries) = appointments;
    }

    /// Add an appointment; an existing entry with the same id is replaced in place
    #[instrument(skip(self, appointment), fields(id = %appointment.id))]
    pub fn append(&self, appointment: Appointment) {
        let mut entries = write(&self.entries);
        match entries.iter_mut().find(|a| a.id == appointment.id) {
            Some(existing) => {
                debug!("Replacing existing appointment");
                *existing = appointment;
            }
            None => entries.push(appointment),
        }
    }

    /// Reflect a server-driven status change. Returns false if `id` is unknown.
    pub fn update_status(&self, id: &AppointmentId, status: AppointmentStatus) -> bool {
        let mut entries = write(&self.entries);
        match entries.iter_mut().find(|a| &a.id == id) {
            Some(appointment) => {
                debug!(id = %id, from = %appointment.status, to = %status, "Status updated");
                appointment.status = status;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &AppointmentId) -> Option<Appointment> {
        read(&self.entries).iter().find(|a| &a.id == id).cloned()
    }

    pub fn list(&self) -> Vec<Appointment> {
        read(&self.entries).clone()
    }

    pub fn len(&self) -> usize {
        read(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.entries).is_empty()
    }

    /// Drop everything (logout)
    pub fn clear(&self) {
        write(&self.entries).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DoctorId, Fee, HospitalId, UserId};
    use chrono::NaiveDate;

    fn appointment(id: &str, time: &str) -> Appointment {
        Appointment {
            id: AppointmentId::from(id),
            user_id: UserId::from("u1"),
            doctor_id: DoctorId::from("D1"),
            hospital_id: HospitalId::from("H1"),
            date: NaiveDate::from_ymd_opt(2026, 11, 3).unwrap(),
            time: time.to_string(),
            status: AppointmentStatus::Pending,
            fee: Fee::from_units(1500),
            created_at: None,
            doctor_name: None,
            hospital_name: None,
            specialty: None,
        }
    }

    #[test]
    fn test_append_is_idempotent_by_id() {
        let store = AppointmentsStore::new();
        store.append(appointment("a1", "09:00"));
        store.append(appointment("a1", "10:00"));

        let all = store.list();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].time, "10:00");
    }

    #[test]
    fn test_replace_all_preserves_order() {
        let store = AppointmentsStore::new();
        store.replace_all(vec![
            appointment("a3", "09:00"),
            appointment("a1", "10:00"),
            appointment("a2", "11:00"),
        ]);

        let ids: Vec<_> = store.list().into_iter().map(|a| a.id.0).collect();
        assert_eq!(ids, vec!["a3", "a1", "a2"]);
    }

    #[test]
    fn test_update_status() {
        let store = AppointmentsStore::new();
        store.append(appointment("a1", "09:00"));

        assert!(store.update_status(&AppointmentId::from("a1"), AppointmentStatus::Confirmed));
        assert_eq!(
            store.get(&AppointmentId::from("a1")).unwrap().status,
            AppointmentStatus::Confirmed
        );

        // Unknown id is a no-op
        assert!(!store.update_status(&AppointmentId::from("zz"), AppointmentStatus::Cancelled));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear() {
        let store = AppointmentsStore::new();
        store.append(appointment("a1", "09:00"));
        store.clear();
        assert!(store.is_empty());
    }
}
