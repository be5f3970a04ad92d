//! Appointment model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{AppointmentId, DoctorId, Fee, HospitalId, UserId};
use crate::error::Error;

/// Appointment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// The only legal initial value
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            other => Err(Error::Decode(format!("unknown appointment status: {}", other))),
        }
    }
}

/// A booked appointment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub user_id: UserId,
    pub doctor_id: DoctorId,
    pub hospital_id: HospitalId,
    pub date: NaiveDate,
    /// `HH:MM`
    pub time: String,
    pub status: AppointmentStatus,
    /// Captured at booking time; never re-read from the catalog
    pub fee: Fee,
    pub created_at: Option<DateTime<Utc>>,
    /// Display labels when the server populated the references
    pub doctor_name: Option<String>,
    pub hospital_name: Option<String>,
    pub specialty: Option<String>,
}

impl Appointment {
    pub fn format_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
