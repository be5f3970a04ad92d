//! REST API request and response shapes
//!
//! These mirror the backend's JSON and are decoupled from the domain
//! models; the app converts between the two. Identifier fields accept both
//! `_id` and `id`, and references may arrive populated.

use serde::{Deserialize, Serialize};

/// Endpoint paths, relative to the API base URL
pub mod paths {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const LOGOUT: &str = "/auth/logout";
    pub const HOSPITALS: &str = "/hospitals";
    pub const DOCTORS: &str = "/doctors";
    pub const ASSOCIATIONS: &str = "/hospital-doctor-associations";
    pub const APPOINTMENTS: &str = "/appointments";

    pub fn user_appointments(user_id: &str) -> String {
        format!("{}/user/{}", APPOINTMENTS, user_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserDto {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Login or register response. Register may omit the token.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    #[serde(default, alias = "accessToken")]
    pub token: Option<String>,
    pub user: UserDto,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDto {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(alias = "specialty")]
    pub specialization: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, alias = "experienceYears")]
    pub experience: u32,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub fee: Option<f64>,
    #[serde(default)]
    pub available_slots: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HospitalDto {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "location")]
    pub address: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub rating: f32,
    /// Present only when the backend embeds doctors in hospitals
    #[serde(default)]
    pub doctors: Vec<DoctorDto>,
}

/// A reference that is either a bare id or a populated object
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RefDto {
    Id(String),
    Populated(PopulatedRef),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopulatedRef {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "specialization")]
    pub specialty: Option<String>,
}

impl RefDto {
    pub fn id(&self) -> &str {
        match self {
            RefDto::Id(id) => id,
            RefDto::Populated(r) => &r.id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            RefDto::Id(_) => None,
            RefDto::Populated(r) => r.name.as_deref(),
        }
    }

    pub fn specialty(&self) -> Option<&str> {
        match self {
            RefDto::Id(_) => None,
            RefDto::Populated(r) => r.specialty.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationDto {
    pub hospital_id: RefDto,
    #[serde(alias = "docId")]
    pub doctor_id: RefDto,
    #[serde(alias = "specialty", alias = "specialization")]
    pub category: String,
    pub fee: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub user_id: String,
    pub doctor_id: String,
    pub hospital_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub fee: f64,
    pub patient_name: String,
    pub patient_email: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
    #[serde(alias = "_id")]
    pub id: String,
    pub user_id: RefDto,
    #[serde(alias = "docId")]
    pub doctor_id: RefDto,
    pub hospital_id: RefDto,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub fee: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Error payload of a non-2xx response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Best human-readable message in a raw error body
    pub fn message_from(body: &[u8]) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
        parsed.message.or(parsed.error)
    }
}
