use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hubspot_client::HubSpotClient;
use selltion_api::adapters::{AirtableStore, HubSpotCrm};
use selltion_api::{build_router, AppState};
use selltion_common::store::RecordStore;
use selltion_common::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("selltion=info".parse()?))
        .init();

    let config = Config::from_env()?;

    let store = match config.airtable() {
        Ok(settings) => {
            let store: Arc<dyn RecordStore> = Arc::new(AirtableStore::from_settings(&settings)?);
            Some(store)
        }
        Err(e) => {
            warn!(error = %e, "Airtable routes will answer with a configuration error");
            None
        }
    };

    let crm = HubSpotCrm::new(HubSpotClient::new()?, config.hubspot());

    let state = Arc::new(AppState {
        store,
        crm: Arc::new(crm),
        hubspot_redirect_uri: config.hubspot_redirect_uri.clone(),
    });

    let app = build_router(state, &config.allowed_origins);

    let addr = format!("{}:{}", config.host, config.port);
    info!("Selltion API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
