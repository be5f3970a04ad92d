//! Authentication session
//!
//! Holds the current user and bearer token, keeps the gateway's token in
//! step with it, and persists it through the session repository.

use std::sync::{Arc, Mutex, RwLock};

use medbook_core::{AppointmentsStore, Error, Result, Session, SessionRepository};
use medbook_net::{ApiGateway, LoginRequest, RegisterRequest};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::network::{login_error, register_error, session_from_auth};

pub struct AuthSession {
    gateway: Arc<ApiGateway>,
    store: Mutex<Box<dyn SessionRepository + Send>>,
    current: RwLock<Option<Session>>,
    appointments: Arc<AppointmentsStore>,
}

impl AuthSession {
    pub fn new(
        gateway: Arc<ApiGateway>,
        store: Box<dyn SessionRepository + Send>,
        appointments: Arc<AppointmentsStore>,
    ) -> Self {
        Self {
            gateway,
            store: Mutex::new(store),
            current: RwLock::new(None),
            appointments,
        }
    }

    /// Current session, if logged in
    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Identity of the current session, for detecting a change across an await
    pub fn session_id(&self) -> Option<Uuid> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|s| s.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_id().is_some()
    }

    /// Reload a persisted session at startup
    pub fn restore(&self) -> Result<Option<Session>> {
        let stored = self.with_store(|store| store.load_session())?;
        if let Some(session) = &stored {
            info!(user_id = %session.user.id, "Restored session");
            self.activate(session.clone());
        }
        Ok(stored)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .gateway
            .login(&LoginRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await
            .map_err(login_error)?;

        let session = session_from_auth(response)
            .ok_or_else(|| Error::Decode("login response carried no token".into()))?;
        self.establish(session.clone());
        info!(user_id = %session.user.id, "Logged in");
        Ok(session)
    }

    /// Register a new account. Returns a session when the backend logs the
    /// new user in straight away.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        password: &str,
    ) -> Result<Option<Session>> {
        let response = self
            .gateway
            .register(&RegisterRequest {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                phone: phone.trim().to_string(),
                password: password.to_string(),
            })
            .await
            .map_err(register_error)?;

        let session = session_from_auth(response);
        match &session {
            Some(session) => {
                self.establish(session.clone());
                info!(user_id = %session.user.id, "Registered and logged in");
            }
            None => info!("Registered; login required"),
        }
        Ok(session)
    }

    /// Run `f` only while `session_id` is still the current session.
    ///
    /// Holds the session lock for the duration of `f`, so a logout either
    /// happens entirely before (and `f` is skipped) or entirely after (and
    /// clears whatever `f` stored).
    pub fn if_current<T>(&self, session_id: Option<Uuid>, f: impl FnOnce() -> T) -> Option<T> {
        let current = self.current.read().unwrap_or_else(|e| e.into_inner());
        match (current.as_ref(), session_id) {
            (Some(session), Some(id)) if session.id == id => Some(f()),
            _ => None,
        }
    }

    /// Clear the session locally, then try to invalidate it remotely.
    /// Local logout never waits on or fails because of the network.
    pub async fn logout(&self) {
        let previous = {
            let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
            self.gateway.set_token(None);
            self.appointments.clear();
            current.take()
        };
        if let Err(e) = self.with_store(|store| store.clear_session()) {
            error!(error = %e, "Failed to clear stored session");
        }

        let Some(previous) = previous else {
            return;
        };
        info!(user_id = %previous.user.id, "Logged out");

        if let Err(e) = self.gateway.logout(&previous.token).await {
            warn!(error = %e, "Remote logout failed; local session already cleared");
        }
    }

    fn establish(&self, session: Session) {
        if let Err(e) = self.with_store(|store| store.save_session(&session)) {
            error!(error = %e, "Failed to persist session; it will not survive a restart");
        }
        self.activate(session);
    }

    fn activate(&self, session: Session) {
        self.gateway.set_token(Some(session.token.clone()));
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(session);
    }

    fn with_store<T>(&self, f: impl FnOnce(&dyn SessionRepository) -> Result<T>) -> Result<T> {
        let store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        f(&**store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{appointment_body, auth_body, ScriptedTransport};
    use medbook_core::Database;
    use medbook_net::HttpResponse;

    fn auth_with(transport: Arc<ScriptedTransport>) -> (AuthSession, Arc<ApiGateway>) {
        let gateway = Arc::new(ApiGateway::new(transport));
        let auth = AuthSession::new(
            gateway.clone(),
            Box::new(Database::open_in_memory().unwrap()),
            Arc::new(AppointmentsStore::new()),
        );
        (auth, gateway)
    }

    #[tokio::test]
    async fn test_login_sets_session_and_token() {
        let transport = ScriptedTransport::new();
        transport.push_ok(&auth_body("u1", Some("tok-1")));
        let (auth, gateway) = auth_with(transport.clone());

        let session = auth.login("jane@example.com", "secret").await.unwrap();
        assert_eq!(session.user.id.as_str(), "u1");
        assert!(auth.is_authenticated());
        assert!(gateway.has_token());
        assert_eq!(transport.last_request().unwrap().path, "/auth/login");
    }

    #[tokio::test]
    async fn test_login_rejection_is_invalid_credentials() {
        let transport = ScriptedTransport::new();
        transport.push(Ok(HttpResponse::new(400, r#"{"message":"Invalid password"}"#)));
        let (auth, _) = auth_with(transport);

        let err = auth.login("jane@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials(m) if m == "Invalid password"));
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_network_failure() {
        let transport = ScriptedTransport::new();
        transport.push(Err(medbook_net::Error::Transport("refused".into())));
        let (auth, _) = auth_with(transport);

        assert!(matches!(auth.login("a@b.co", "x").await, Err(Error::Network(_))));
    }

    #[tokio::test]
    async fn test_register_without_token_leaves_logged_out() {
        let transport = ScriptedTransport::new();
        transport.push_ok(&auth_body("u2", None));
        let (auth, _) = auth_with(transport);

        let session = auth
            .register("Sam", "sam@example.com", "555", "hunter22")
            .await
            .unwrap();
        assert!(session.is_none());
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_with_token_logs_in() {
        let transport = ScriptedTransport::new();
        transport.push_ok(&auth_body("u2", Some("tok-2")));
        let (auth, _) = auth_with(transport);

        let session = auth
            .register("Sam", "sam@example.com", "555", "hunter22")
            .await
            .unwrap();
        assert!(session.is_some());
        assert!(auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_validation_error() {
        let transport = ScriptedTransport::new();
        transport.push(Ok(HttpResponse::new(409, r#"{"message":"Email already exists"}"#)));
        let (auth, _) = auth_with(transport);

        let err = auth
            .register("Sam", "sam@example.com", "555", "hunter22")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[tokio::test]
    async fn test_logout_succeeds_when_remote_fails() {
        let transport = ScriptedTransport::new();
        transport.push_ok(&auth_body("u1", Some("tok-1")));
        transport.push(Err(medbook_net::Error::Transport("offline".into())));
        let (auth, gateway) = auth_with(transport.clone());

        auth.login("jane@example.com", "secret").await.unwrap();
        auth.logout().await;

        assert!(!auth.is_authenticated());
        assert!(!gateway.has_token());
        let logout = transport.last_request().unwrap();
        assert_eq!(logout.path, "/auth/logout");
        assert_eq!(logout.header("Authorization"), Some("Bearer tok-1"));
    }

    #[tokio::test]
    async fn test_if_current_skips_after_logout() {
        let transport = ScriptedTransport::new();
        transport.push_ok(&auth_body("u1", Some("tok-1")));
        transport.push_ok(&serde_json::json!({}));
        let (auth, _) = auth_with(transport);

        let session = auth.login("jane@example.com", "secret").await.unwrap();
        assert_eq!(auth.if_current(Some(session.id), || 7), Some(7));
        assert_eq!(auth.if_current(Some(Uuid::new_v4()), || 7), None);
        assert_eq!(auth.if_current(None, || 7), None);

        auth.logout().await;
        let mut ran = false;
        assert!(auth.if_current(Some(session.id), || ran = true).is_none());
        assert!(!ran);
    }

    #[tokio::test]
    async fn test_logout_clears_appointments_stored_under_session() {
        let transport = ScriptedTransport::new();
        transport.push_ok(&auth_body("u1", Some("tok-1")));
        transport.push_ok(&serde_json::json!({}));
        let gateway = Arc::new(ApiGateway::new(transport));
        let appointments = Arc::new(AppointmentsStore::new());
        let auth = AuthSession::new(
            gateway,
            Box::new(Database::open_in_memory().unwrap()),
            appointments.clone(),
        );

        let session = auth.login("jane@example.com", "secret").await.unwrap();
        let appointment: medbook_core::Appointment = crate::network::appointment_from_dto(
            serde_json::from_value(appointment_body("a1", "u1", "d1", "h1", 1500.0)).unwrap(),
        )
        .unwrap();
        auth.if_current(Some(session.id), || appointments.append(appointment.clone()))
            .unwrap();
        assert_eq!(appointments.len(), 1);

        auth.logout().await;
        assert!(appointments.is_empty());
        assert!(auth
            .if_current(Some(session.id), || appointments.append(appointment))
            .is_none());
        assert!(appointments.is_empty());
    }

    #[tokio::test]
    async fn test_logout_without_session_makes_no_call() {
        let transport = ScriptedTransport::new();
        let (auth, _) = auth_with(transport.clone());

        auth.logout().await;
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_session_restored_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medbook.db");

        let transport = ScriptedTransport::new();
        transport.push_ok(&auth_body("u1", Some("tok-1")));
        let gateway = Arc::new(ApiGateway::new(transport.clone()));
        let first = AuthSession::new(
            gateway,
            Box::new(Database::open(&path).unwrap()),
            Arc::new(AppointmentsStore::new()),
        );
        let original = first.login("jane@example.com", "secret").await.unwrap();

        let gateway = Arc::new(ApiGateway::new(transport));
        let second = AuthSession::new(
            gateway.clone(),
            Box::new(Database::open(&path).unwrap()),
            Arc::new(AppointmentsStore::new()),
        );
        let restored = second.restore().unwrap().unwrap();
        assert_eq!(restored.id, original.id);
        assert_eq!(second.session_id(), Some(original.id));
        assert!(gateway.has_token());
    }
}
