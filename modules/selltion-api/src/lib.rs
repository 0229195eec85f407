pub mod adapters;
pub mod error;
pub mod rest;
pub mod routes;

use std::sync::Arc;

use selltion_common::crm::CrmClient;
use selltion_common::store::RecordStore;
use selltion_common::SelltionError;

pub use routes::build_router;

/// Shared, read-only state for all handlers.
pub struct AppState {
    /// `None` when the Airtable configuration is incomplete.
    pub store: Option<Arc<dyn RecordStore>>,
    pub crm: Arc<dyn CrmClient>,
    pub hubspot_redirect_uri: Option<String>,
}

impl AppState {
    pub fn store(&self) -> Result<&dyn RecordStore, SelltionError> {
        self.store
            .as_deref()
            .ok_or_else(|| SelltionError::Config("Airtable store is not configured".into()))
    }
}
