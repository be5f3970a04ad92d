//! Scripted transport for exercising services without a backend

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use medbook_net::{HttpRequest, HttpResponse, Transport};
use serde_json::{json, Value};
use tokio::sync::Notify;

type Scripted = Result<HttpResponse, medbook_net::Error>;

/// Replays queued responses in order and records every request.
///
/// After [`ScriptedTransport::hold`], the next request is recorded and then
/// parks until [`ScriptedTransport::release`], which lets a test act while a
/// call is in flight. Requests after the held one go straight through.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
    gate: Mutex<Option<Arc<Notify>>>,
    held: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, response: Scripted) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn push_ok(&self, body: &Value) {
        self.push(Ok(HttpResponse::new(200, body.to_string())));
    }

    pub fn hold(&self) {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        *self.held.lock().unwrap() = Some(gate);
    }

    pub fn release(&self) {
        if let Some(gate) = self.held.lock().unwrap().take() {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Yield until `n` requests have reached the transport
    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> medbook_net::Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(medbook_net::Error::Transport("no scripted response".into())))
    }
}

pub fn user_body(id: &str) -> Value {
    json!({ "_id": id, "name": "Jane Doe", "email": "jane@example.com", "phone": "555-0100" })
}

pub fn auth_body(user_id: &str, token: Option<&str>) -> Value {
    match token {
        Some(token) => json!({ "token": token, "user": user_body(user_id) }),
        None => json!({ "user": user_body(user_id) }),
    }
}

pub fn hospitals_body() -> Value {
    json!([
        { "_id": "h1", "name": "Central Hospital", "address": "123 Healthcare Ave", "rating": 4.8 },
        { "_id": "h2", "name": "Riverside Clinic", "location": "9 River Rd", "rating": 4.2 }
    ])
}

pub fn doctors_body() -> Value {
    json!([
        {
            "_id": "d1", "name": "Dr. Sarah Johnson", "specialization": "Cardiologist",
            "experience": 15, "rating": 4.9, "availableSlots": ["09:00", "10:30", "14:00"]
        },
        {
            "_id": "d2", "name": "Dr. Michael Chen", "specialization": "Dermatologist",
            "experience": 8, "rating": 4.6, "availableSlots": ["11:00"]
        }
    ])
}

pub fn associations_body() -> Value {
    json!([
        { "hospitalId": "h1", "doctorId": "d1", "category": "cardiology", "fee": 1500 },
        { "hospitalId": "h1", "doctorId": "d2", "category": "dermatology", "fee": 800 },
        { "hospitalId": "h2", "doctorId": "d1", "category": "cardiology", "fee": 1200 }
    ])
}

pub fn appointment_body(id: &str, user_id: &str, doctor_id: &str, hospital_id: &str, fee: f64) -> Value {
    json!({
        "_id": id,
        "userId": user_id,
        "doctorId": doctor_id,
        "hospitalId": hospital_id,
        "date": "2030-05-01",
        "time": "09:00",
        "status": "pending",
        "fee": fee
    })
}
