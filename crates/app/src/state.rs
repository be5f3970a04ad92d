//! Application state management

use std::sync::Arc;
use std::time::Duration;

use medbook_core::{
    AppointmentsStore, CatalogStore, Config, Database, Error, HospitalId, Result,
    SessionRepository,
};
use medbook_net::{ApiGateway, ReqwestTransport, Transport};
use tracing::info;

use crate::viewmodel::{AppointmentsService, AuthSession, BookingWorkflow, CatalogService};

/// Shared services, one per process
pub struct AppState {
    pub config: Config,
    pub gateway: Arc<ApiGateway>,
    pub auth: Arc<AuthSession>,
    pub catalog: CatalogService,
    pub appointments: AppointmentsService,
}

impl AppState {
    /// Wire the real HTTP transport and the on-disk session database
    pub fn new(config: Config) -> Result<Self> {
        let db_path = config.database_path()?;
        let db = Database::open(&db_path)?;
        info!(path = %db_path.display(), "Opened session database");

        let transport = ReqwestTransport::new(
            config.api.base_url.clone(),
            Duration::from_secs(config.api.timeout_secs),
        )
        .map_err(|e| Error::Config(e.to_string()))?;

        Ok(Self::with_parts(config, Arc::new(transport), Box::new(db)))
    }

    pub fn with_parts(
        config: Config,
        transport: Arc<dyn Transport>,
        sessions: Box<dyn SessionRepository + Send>,
    ) -> Self {
        let gateway = Arc::new(ApiGateway::new(transport));
        let appointment_store = Arc::new(AppointmentsStore::new());
        let auth = Arc::new(AuthSession::new(
            gateway.clone(),
            sessions,
            appointment_store.clone(),
        ));
        let catalog = CatalogService::new(gateway.clone(), Arc::new(CatalogStore::new()));
        let appointments =
            AppointmentsService::new(gateway.clone(), auth.clone(), appointment_store);

        Self {
            config,
            gateway,
            auth,
            catalog,
            appointments,
        }
    }

    /// A fresh booking workflow for one hospital
    pub fn booking(&self, hospital_id: HospitalId) -> BookingWorkflow {
        BookingWorkflow::new(
            hospital_id,
            self.gateway.clone(),
            self.auth.clone(),
            self.catalog.store().clone(),
            self.appointments.store().clone(),
        )
    }
}
