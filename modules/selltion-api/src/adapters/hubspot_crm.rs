use async_trait::async_trait;
use hubspot_client::{ContactProperties, HubSpotClient, HubSpotError, OAuthApp};
use serde_json::Value;

use selltion_common::crm::{CrmClient, NewContact};
use selltion_common::{HubSpotSettings, SelltionError};

/// [`CrmClient`] over the HubSpot REST API.
pub struct HubSpotCrm {
    client: HubSpotClient,
    settings: HubSpotSettings,
}

impl HubSpotCrm {
    pub fn new(client: HubSpotClient, settings: HubSpotSettings) -> Self {
        Self { client, settings }
    }

    fn oauth_app(&self) -> Result<OAuthApp, SelltionError> {
        match (&self.settings.client_id, &self.settings.client_secret) {
            (Some(client_id), Some(client_secret)) => Ok(OAuthApp {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            }),
            _ => Err(SelltionError::Config(
                "HUBSPOT_CLIENT_ID and HUBSPOT_CLIENT_SECRET are required".into(),
            )),
        }
    }
}

fn crm_error(err: HubSpotError) -> SelltionError {
    match err {
        HubSpotError::Api {
            status,
            message,
            details,
        } => SelltionError::Crm {
            status,
            message,
            details,
        },
        other => SelltionError::CrmTransport(other.to_string()),
    }
}

#[async_trait]
impl CrmClient for HubSpotCrm {
    async fn create_contact(&self, contact: &NewContact) -> Result<String, SelltionError> {
        let token = self
            .settings
            .token
            .as_deref()
            .ok_or_else(|| SelltionError::Config("HUBSPOT_TOKEN is required".into()))?;

        let properties = ContactProperties {
            firstname: contact.first_name.clone(),
            lastname: contact.last_name.clone(),
            hs_linkedin_url: contact.linkedin_url.clone(),
        };
        let created = self
            .client
            .create_contact(token, &properties)
            .await
            .map_err(crm_error)?;
        Ok(created.id)
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<Value, SelltionError> {
        let app = self.oauth_app()?;
        self.client
            .exchange_code(&app, redirect_uri, code)
            .await
            .map_err(crm_error)
    }
}
