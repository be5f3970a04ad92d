//! Translation between the gateway's wire shapes and domain models
//!
//! Also the one place where gateway errors become core errors.

use chrono::{DateTime, NaiveDate, Utc};
use medbook_core::validation::{parse_date, parse_time, DATE_FORMAT, TIME_FORMAT};
use medbook_core::{
    Appointment, AppointmentId, AppointmentStatus, Association, BookingRequest, Catalog, Doctor,
    DoctorId, EmbeddedHospital, Error, Fee, Hospital, HospitalId, Result, Session, UserId,
    UserProfile,
};
use medbook_net::{
    AppointmentDto, AssociationDto, AuthResponse, BookAppointmentRequest, DoctorDto, HospitalDto,
    UserDto,
};

/// Map a gateway failure for data calls
pub fn gateway_error(err: medbook_net::Error) -> Error {
    match err {
        medbook_net::Error::Transport(msg) => Error::Network(msg),
        medbook_net::Error::Decode(msg) => Error::Decode(msg),
        medbook_net::Error::Unauthorized => Error::AuthRequired,
        medbook_net::Error::Rejected { status, message } => Error::Rejected { status, message },
    }
}

/// Login: any non-2xx auth response means the credentials were rejected
pub fn login_error(err: medbook_net::Error) -> Error {
    match err {
        medbook_net::Error::Rejected { message, .. } => Error::InvalidCredentials(message),
        medbook_net::Error::Unauthorized => Error::InvalidCredentials("Login failed".into()),
        other => gateway_error(other),
    }
}

/// Register: a rejection is an opaque validation failure
pub fn register_error(err: medbook_net::Error) -> Error {
    match err {
        medbook_net::Error::Rejected { message, .. } => Error::Validation {
            fields: Vec::new(),
            reason: message,
        },
        other => gateway_error(other),
    }
}

fn check_rating(kind: &str, id: &str, rating: f32) -> Result<f32> {
    if (0.0..=5.0).contains(&rating) {
        Ok(rating)
    } else {
        Err(Error::Decode(format!("{} {} has rating {} outside 0-5", kind, id, rating)))
    }
}

pub fn hospital_from_dto(dto: &HospitalDto) -> Result<Hospital> {
    Ok(Hospital {
        id: HospitalId::new(dto.id.clone()),
        name: dto.name.clone(),
        address: dto.address.clone(),
        image: dto.image.clone(),
        rating: check_rating("hospital", &dto.id, dto.rating)?,
    })
}

pub fn doctor_from_dto(dto: DoctorDto) -> Result<Doctor> {
    let available_slots = dto
        .available_slots
        .iter()
        .map(|slot| parse_time(slot))
        .collect::<Result<Vec<_>>>()?;
    let fee = match dto.fee {
        Some(amount) => Fee::from_f64(amount)?,
        None => Fee::ZERO,
    };

    Ok(Doctor {
        rating: check_rating("doctor", &dto.id, dto.rating)?,
        id: DoctorId::new(dto.id),
        name: dto.name,
        specialization: dto.specialization.parse()?,
        image: dto.image,
        experience_years: dto.experience,
        fee,
        available_slots,
    })
}

pub fn association_from_dto(dto: &AssociationDto) -> Result<Association> {
    Ok(Association::new(
        HospitalId::new(dto.hospital_id.id()),
        DoctorId::new(dto.doctor_id.id()),
        dto.category.parse()?,
        Fee::from_f64(dto.fee)?,
    ))
}

/// Build the normalized catalog from the three endpoint payloads
pub fn catalog_from_dtos(
    hospitals: Vec<HospitalDto>,
    doctors: Vec<DoctorDto>,
    associations: Vec<AssociationDto>,
) -> Result<Catalog> {
    let hospitals = hospitals
        .iter()
        .map(hospital_from_dto)
        .collect::<Result<Vec<_>>>()?;
    let doctors = doctors
        .into_iter()
        .map(doctor_from_dto)
        .collect::<Result<Vec<_>>>()?;
    let associations = associations
        .iter()
        .map(association_from_dto)
        .collect::<Result<Vec<_>>>()?;
    Ok(Catalog::new(hospitals, doctors, associations))
}

/// Build the catalog from hospitals that embed their doctors
pub fn catalog_from_embedded(hospitals: Vec<HospitalDto>) -> Result<Catalog> {
    let embedded = hospitals
        .into_iter()
        .map(|dto| {
            let hospital = hospital_from_dto(&dto)?;
            let doctors = dto
                .doctors
                .into_iter()
                .map(doctor_from_dto)
                .collect::<Result<Vec<_>>>()?;
            Ok(EmbeddedHospital { hospital, doctors })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Catalog::from_embedded(embedded))
}

/// Dates arrive either as `YYYY-MM-DD` or as a full timestamp
fn parse_wire_date(value: &str) -> Result<NaiveDate> {
    parse_date(value).or_else(|_| {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc).date_naive())
            .map_err(|e| Error::Decode(format!("invalid appointment date {:?}: {}", value, e)))
    })
}

pub fn appointment_from_dto(dto: AppointmentDto) -> Result<Appointment> {
    let time = parse_time(&dto.time)?.format(TIME_FORMAT).to_string();
    let status = match dto.status.as_deref() {
        Some(s) => s.parse()?,
        None => AppointmentStatus::Pending,
    };
    let fee = match dto.fee {
        Some(amount) => Fee::from_f64(amount)?,
        None => Fee::ZERO,
    };
    let created_at = dto
        .created_at
        .as_deref()
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| Error::Decode(format!("invalid createdAt {:?}: {}", s, e)))
        })
        .transpose()?;

    Ok(Appointment {
        id: AppointmentId::new(dto.id),
        user_id: UserId::new(dto.user_id.id()),
        doctor_id: DoctorId::new(dto.doctor_id.id()),
        hospital_id: HospitalId::new(dto.hospital_id.id()),
        date: parse_wire_date(&dto.date)?,
        time,
        status,
        fee,
        created_at,
        doctor_name: dto.doctor_id.name().map(str::to_string),
        hospital_name: dto.hospital_id.name().map(str::to_string),
        specialty: dto.doctor_id.specialty().map(str::to_string),
    })
}

pub fn booking_request_to_dto(request: &BookingRequest) -> BookAppointmentRequest {
    BookAppointmentRequest {
        user_id: request.user_id.to_string(),
        doctor_id: request.doctor_id.to_string(),
        hospital_id: request.hospital_id.to_string(),
        date: request.date.format(DATE_FORMAT).to_string(),
        time: request.time.clone(),
        fee: request.fee.to_f64(),
        patient_name: request.patient_name.clone(),
        patient_email: request.patient_email.clone(),
    }
}

pub fn user_from_dto(dto: UserDto) -> UserProfile {
    UserProfile {
        id: UserId::new(dto.id),
        name: dto.name,
        email: dto.email,
        phone: dto.phone.filter(|p| !p.trim().is_empty()),
    }
}

/// A session if the response carried a token
pub fn session_from_auth(response: AuthResponse) -> Option<Session> {
    let user = user_from_dto(response.user);
    response
        .token
        .filter(|t| !t.is_empty())
        .map(|token| Session::new(user, token))
}
