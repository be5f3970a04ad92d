//! Catalog of hospitals, doctors and their associations

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use tracing::{debug, info, instrument, warn};

use super::{read, write};
use crate::models::{
    Association, Category, Doctor, DoctorId, DoctorListing, Hospital, HospitalId,
    HospitalSummary,
};

/// An immutable catalog snapshot
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    hospitals: Vec<Hospital>,
    doctors: HashMap<DoctorId, Doctor>,
    associations: Vec<Association>,
}

/// Hospital with its doctors embedded, the flat shape some backends serve
#[derive(Debug, Clone)]
pub struct EmbeddedHospital {
    pub hospital: Hospital,
    pub doctors: Vec<Doctor>,
}

impl Catalog {
    /// Build a normalized catalog.
    ///
    /// Associations pointing at an unknown hospital or doctor are dropped, as
    /// are repeats of an already seen (hospital, doctor) pair.
    pub fn new(
        hospitals: Vec<Hospital>,
        doctors: Vec<Doctor>,
        associations: Vec<Association>,
    ) -> Self {
        let hospital_ids: HashSet<&HospitalId> = hospitals.iter().map(|h| &h.id).collect();
        let doctors: HashMap<DoctorId, Doctor> =
            doctors.into_iter().map(|d| (d.id.clone(), d)).collect();

        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(associations.len());
        for assoc in associations {
            if !hospital_ids.contains(&assoc.hospital_id) || !doctors.contains_key(&assoc.doctor_id) {
                warn!(
                    hospital_id = %assoc.hospital_id,
                    doctor_id = %assoc.doctor_id,
                    "Dropping association with unknown hospital or doctor"
                );
                continue;
            }
            if !seen.insert((assoc.hospital_id.clone(), assoc.doctor_id.clone())) {
                warn!(
                    hospital_id = %assoc.hospital_id,
                    doctor_id = %assoc.doctor_id,
                    "Dropping duplicate association"
                );
                continue;
            }
            kept.push(assoc);
        }

        Self {
            hospitals,
            doctors,
            associations: kept,
        }
    }

    /// Normalize hospitals with embedded doctors into associations.
    ///
    /// Each embedded doctor is associated under its own specialization and fee.
    pub fn from_embedded(embedded: Vec<EmbeddedHospital>) -> Self {
        let mut hospitals = Vec::with_capacity(embedded.len());
        let mut doctors: Vec<Doctor> = Vec::new();
        let mut known: HashSet<DoctorId> = HashSet::new();
        let mut associations = Vec::new();

        for entry in embedded {
            for doctor in entry.doctors {
                associations.push(Association::new(
                    entry.hospital.id.clone(),
                    doctor.id.clone(),
                    doctor.specialization,
                    doctor.fee,
                ));
                if known.insert(doctor.id.clone()) {
                    doctors.push(doctor);
                }
            }
            hospitals.push(entry.hospital);
        }

        Self::new(hospitals, doctors, associations)
    }

    pub fn is_empty(&self) -> bool {
        self.hospitals.is_empty()
    }

    pub fn hospitals(&self) -> &[Hospital] {
        &self.hospitals
    }

    pub fn hospital(&self, id: &HospitalId) -> Option<&Hospital> {
        self.hospitals.iter().find(|h| &h.id == id)
    }

    pub fn doctor(&self, id: &DoctorId) -> Option<&Doctor> {
        self.doctors.get(id)
    }

    pub fn doctors(&self) -> impl Iterator<Item = &Doctor> {
        self.doctors.values()
    }

    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    /// Doctors practicing at a hospital, in association order.
    /// Empty if the hospital is unknown or has no associations.
    pub fn doctors_for(&self, hospital_id: &HospitalId) -> Vec<DoctorListing> {
        self.associations
            .iter()
            .filter(|a| &a.hospital_id == hospital_id)
            .filter_map(|a| self.listing_for(a))
            .collect()
    }

    /// Doctors at a hospital listed under `category`, or all of them for `None`
    pub fn doctors_in_category(
        &self,
        hospital_id: &HospitalId,
        category: Option<Category>,
    ) -> Vec<DoctorListing> {
        let mut listings = self.doctors_for(hospital_id);
        if let Some(category) = category {
            listings.retain(|l| l.category == category);
        }
        listings
    }

    /// One doctor's listing at one hospital
    pub fn listing(&self, hospital_id: &HospitalId, doctor_id: &DoctorId) -> Option<DoctorListing> {
        self.associations
            .iter()
            .find(|a| &a.hospital_id == hospital_id && &a.doctor_id == doctor_id)
            .and_then(|a| self.listing_for(a))
    }

    /// Ordered doctor identifiers associated with a hospital
    pub fn doctor_ids_for(&self, hospital_id: &HospitalId) -> Vec<DoctorId> {
        self.associations
            .iter()
            .filter(|a| &a.hospital_id == hospital_id)
            .map(|a| a.doctor_id.clone())
            .collect()
    }

    /// Count of distinct doctors associated with a hospital
    pub fn doctor_count(&self, hospital_id: &HospitalId) -> usize {
        self.associations
            .iter()
            .filter(|a| &a.hospital_id == hospital_id)
            .map(|a| &a.doctor_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Hospitals with derived doctor counts, in catalog order
    pub fn summaries(&self) -> Vec<HospitalSummary> {
        self.hospitals
            .iter()
            .map(|h| HospitalSummary {
                hospital: h.clone(),
                doctor_count: self.doctor_count(&h.id),
            })
            .collect()
    }

    fn listing_for(&self, assoc: &Association) -> Option<DoctorListing> {
        self.doctors.get(&assoc.doctor_id).map(|doctor| DoctorListing {
            hospital_id: assoc.hospital_id.clone(),
            doctor: doctor.clone(),
            category: assoc.category,
            fee: assoc.fee,
        })
    }
}

/// Process-wide holder of the current catalog snapshot.
///
/// Readers clone an `Arc` to the snapshot; a refresh swaps the whole
/// snapshot at once, so a half-updated catalog is never observable.
#[derive(Debug, Default)]
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<Catalog> {
        read(&self.current).clone()
    }

    /// Atomically replace the snapshot
    #[instrument(skip(self, catalog), fields(hospitals = catalog.hospitals.len()))]
    pub fn replace(&self, catalog: Catalog) {
        let associations = catalog.associations.len();
        *write(&self.current) = Arc::new(catalog);
        info!(associations, "Catalog replaced");
    }

    pub fn doctors_for(&self, hospital_id: &HospitalId) -> Vec<DoctorListing> {
        self.snapshot().doctors_for(hospital_id)
    }

    pub fn hospital_count_of_doctors(&self, hospital_id: &HospitalId) -> usize {
        let count = self.snapshot().doctor_count(hospital_id);
        debug!(hospital_id = %hospital_id, count, "Derived doctor count");
        count
    }

    pub fn hospital_summaries(&self) -> Vec<HospitalSummary> {
        self.snapshot().summaries()
    }
}
