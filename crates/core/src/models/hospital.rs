//! Hospital and hospital-doctor association models

use serde::{Deserialize, Serialize};

use super::{Category, DoctorId, Fee, HospitalId};

/// A hospital in the catalog
///
/// The doctor list and doctor count are not stored here; both are derived
/// from the association set so they cannot drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: HospitalId,
    pub name: String,
    pub address: String,
    pub image: Option<String>,
    /// Aggregate rating, 0.0 to 5.0
    pub rating: f32,
}

/// A (hospital, doctor) pairing with the category and fee specific to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub hospital_id: HospitalId,
    pub doctor_id: DoctorId,
    pub category: Category,
    pub fee: Fee,
}

impl Association {
    pub fn new(hospital_id: HospitalId, doctor_id: DoctorId, category: Category, fee: Fee) -> Self {
        Self {
            hospital_id,
            doctor_id,
            category,
            fee,
        }
    }
}

/// Hospital with its derived doctor count, as shown on the home list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HospitalSummary {
    pub hospital: Hospital,
    pub doctor_count: usize,
}
