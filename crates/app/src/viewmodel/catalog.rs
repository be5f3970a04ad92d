//! Catalog loading

use std::sync::Arc;

use medbook_core::invariants::assert_catalog_invariants;
use medbook_core::{CatalogStore, Result};
use medbook_net::ApiGateway;
use tracing::{info, instrument};

use crate::network::{catalog_from_dtos, catalog_from_embedded, gateway_error};

pub struct CatalogService {
    gateway: Arc<ApiGateway>,
    store: Arc<CatalogStore>,
}

impl CatalogService {
    pub fn new(gateway: Arc<ApiGateway>, store: Arc<CatalogStore>) -> Self {
        Self { gateway, store }
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    /// Fetch and normalize the catalog, replacing the snapshot only when
    /// everything decoded. On failure the previous snapshot stays visible.
    #[instrument(skip(self))]
    pub async fn load_catalog(&self) -> Result<()> {
        let hospitals = self.gateway.hospitals().await.map_err(gateway_error)?;

        let catalog = if hospitals.iter().any(|h| !h.doctors.is_empty()) {
            catalog_from_embedded(hospitals)?
        } else {
            let (doctors, associations) =
                tokio::try_join!(self.gateway.doctors(), self.gateway.associations())
                    .map_err(gateway_error)?;
            catalog_from_dtos(hospitals, doctors, associations)?
        };

        assert_catalog_invariants(&catalog);
        info!(
            hospitals = catalog.hospitals().len(),
            associations = catalog.associations().len(),
            "Catalog loaded"
        );
        self.store.replace(catalog);
        Ok(())
    }
}
