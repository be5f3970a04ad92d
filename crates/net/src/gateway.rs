//! API gateway
//!
//! Single egress point to the backend. Attaches the bearer token when one is
//! set, maps HTTP status codes to typed errors and decodes JSON bodies.

use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::protocol::{
    paths, AppointmentDto, AssociationDto, AuthResponse, BookAppointmentRequest, DoctorDto,
    ErrorBody, HospitalDto, LoginRequest, RegisterRequest,
};
use crate::transport::{HttpRequest, HttpResponse, Transport};

pub struct ApiGateway {
    transport: Arc<dyn Transport>,
    token: RwLock<Option<String>>,
}

impl ApiGateway {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            token: RwLock::new(None),
        }
    }

    /// Set or clear the bearer token attached to every request
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        self.post(paths::LOGIN, request).await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        self.post(paths::REGISTER, request).await
    }

    /// Remote invalidation of `token`. Takes the token explicitly so the
    /// caller can clear local state before the call goes out.
    pub async fn logout(&self, token: &str) -> Result<()> {
        let request = HttpRequest::post(paths::LOGOUT, serde_json::json!({}))
            .with_header("Authorization", format!("Bearer {}", token));
        self.execute(request).await.map(|_| ())
    }

    pub async fn hospitals(&self) -> Result<Vec<HospitalDto>> {
        self.get(paths::HOSPITALS).await
    }

    pub async fn doctors(&self) -> Result<Vec<DoctorDto>> {
        self.get(paths::DOCTORS).await
    }

    pub async fn associations(&self) -> Result<Vec<AssociationDto>> {
        self.get(paths::ASSOCIATIONS).await
    }

    #[instrument(skip(self, request), fields(doctor_id = %request.doctor_id, hospital_id = %request.hospital_id))]
    pub async fn book_appointment(&self, request: &BookAppointmentRequest) -> Result<AppointmentDto> {
        self.post(paths::APPOINTMENTS, request).await
    }

    pub async fn user_appointments(&self, user_id: &str) -> Result<Vec<AppointmentDto>> {
        self.get(&paths::user_appointments(user_id)).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(self.authorize(HttpRequest::get(path))).await?;
        decode(&response)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let response = self
            .execute(self.authorize(HttpRequest::post(path, body)))
            .await?;
        decode(&response)
    }

    fn authorize(&self, request: HttpRequest) -> HttpRequest {
        let token = self
            .token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match token {
            Some(token) => request.with_header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        let path = request.path.clone();
        let response = self.transport.send(request).await?;

        if response.is_success() {
            debug!(%method, %path, status = response.status, "Request succeeded");
            return Ok(response);
        }

        if response.status == 401 {
            warn!(%method, %path, "Request unauthorized");
            return Err(Error::Unauthorized);
        }

        let message = ErrorBody::message_from(&response.body)
            .unwrap_or_else(|| format!("HTTP {}", response.status));
        warn!(%method, %path, status = response.status, %message, "Request rejected");
        Err(Error::Rejected {
            status: response.status,
            message,
        })
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(|e| Error::Decode(e.to_string()))
}
