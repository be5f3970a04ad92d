//! MedBook Network Library
//!
//! The API gateway: the only component that talks to the backend.
//!
//! # Architecture
//!
//! - **Protocol**: JSON request/response shapes of the REST API
//! - **Transport**: sends one HTTP request, returns status and body
//! - **Gateway**: attaches the bearer token, maps HTTP status to errors,
//!   decodes bodies. Never retries and never caches.
//!
//! # Usage
//!
//! ```ignore
//! let transport = ReqwestTransport::new("http://localhost:3000/api", Duration::from_secs(30))?;
//! let gateway = ApiGateway::new(Arc::new(transport));
//!
//! let auth = gateway.login(&LoginRequest { email, password }).await?;
//! gateway.set_token(auth.token.clone());
//! let hospitals = gateway.hospitals().await?;
//! ```

pub mod error;
pub mod gateway;
pub mod protocol;
pub mod transport;

pub use error::{Error, Result};
pub use gateway::ApiGateway;
pub use protocol::{
    AppointmentDto, AssociationDto, AuthResponse, BookAppointmentRequest, DoctorDto, HospitalDto,
    LoginRequest, RefDto, RegisterRequest, UserDto,
};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
