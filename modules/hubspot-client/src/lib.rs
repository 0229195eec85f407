pub mod error;
pub mod types;

pub use error::{HubSpotError, Result};
pub use types::{Contact, ContactProperties, OAuthApp};

use std::time::Duration;

use serde_json::Value;
use types::{CreateContactRequest, TokenRequest};

const BASE_URL: &str = "https://api.hubapi.com";

pub struct HubSpotClient {
    client: reqwest::Client,
    base_url: String,
}

impl HubSpotClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    /// Point the client at a different API root (used by tests).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a contact with a private-app access token.
    pub async fn create_contact(&self, token: &str, properties: &ContactProperties) -> Result<Contact> {
        let url = format!("{}/crm/v3/objects/contacts", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&CreateContactRequest { properties })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body, "Contact creation failed"));
        }

        let contact: Contact = resp.json().await?;
        tracing::info!(contact_id = %contact.id, "Created HubSpot contact");
        Ok(contact)
    }

    /// Exchange an OAuth authorization code for tokens.
    ///
    /// The token payload is returned untouched so callers can hand it to the
    /// browser extension as-is.
    pub async fn exchange_code(&self, app: &OAuthApp, redirect_uri: &str, code: &str) -> Result<Value> {
        let url = format!("{}/oauth/v1/token", self.base_url);
        let form = TokenRequest {
            grant_type: "authorization_code",
            client_id: &app.client_id,
            client_secret: &app.client_secret,
            redirect_uri,
            code,
        };

        let resp = self.client.post(&url).form(&form).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "HubSpot token exchange rejected");
            return Err(api_error(status.as_u16(), &body, "Token exchange failed"));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Build an [`HubSpotError::Api`] from a raw body. HubSpot error bodies look
/// like `{"status":"error","message":"..."}`; anything else keeps `fallback`.
fn api_error(status: u16, body: &str, fallback: &str) -> HubSpotError {
    let details: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let message = details
        .get("message")
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| fallback.to_string());
    HubSpotError::Api {
        status,
        message,
        details,
    }
}
