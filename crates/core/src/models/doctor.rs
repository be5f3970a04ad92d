//! Doctor model

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::{Category, DoctorId, Fee, HospitalId};

/// A doctor as listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    /// Default specialization; a hospital association may list another
    pub specialization: Category,
    pub image: Option<String>,
    pub experience_years: u32,
    /// 0.0 to 5.0
    pub rating: f32,
    /// Default consultation fee; the association fee takes precedence
    pub fee: Fee,
    pub available_slots: Vec<NaiveTime>,
}

impl Doctor {
    /// Slots formatted for display (`HH:MM`)
    pub fn slot_labels(&self) -> Vec<String> {
        self.available_slots
            .iter()
            .map(|t| t.format(crate::validation::TIME_FORMAT).to_string())
            .collect()
    }
}

/// A doctor as practicing at one hospital, with that association's terms
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorListing {
    pub hospital_id: HospitalId,
    pub doctor: Doctor,
    pub category: Category,
    pub fee: Fee,
}
