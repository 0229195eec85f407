// CRM port. Production wires in HubSpot; tests use MockCrm.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::SelltionError;

/// A contact to create in the CRM, as sent by the extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewContact {
    #[serde(rename = "nombre", default)]
    pub first_name: Option<String>,
    #[serde(rename = "apellido", default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

#[async_trait]
pub trait CrmClient: Send + Sync {
    /// Returns the CRM's id for the new contact.
    async fn create_contact(&self, contact: &NewContact) -> Result<String, SelltionError>;

    /// Exchange an OAuth authorization code. The token payload is opaque.
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<Value, SelltionError>;
}

// ---------------------------------------------------------------------------
// MockCrm (for tests)
// ---------------------------------------------------------------------------

/// Records calls; `exchange_code` accepts only `valid_code`.
pub struct MockCrm {
    valid_code: String,
    contacts: Mutex<Vec<NewContact>>,
    exchanges: Mutex<Vec<(String, String)>>,
}

impl MockCrm {
    pub fn new(valid_code: &str) -> Self {
        Self {
            valid_code: valid_code.to_string(),
            contacts: Mutex::new(Vec::new()),
            exchanges: Mutex::new(Vec::new()),
        }
    }

    pub fn contacts(&self) -> Vec<NewContact> {
        self.contacts.lock().unwrap().clone()
    }

    pub fn exchanges(&self) -> Vec<(String, String)> {
        self.exchanges.lock().unwrap().clone()
    }
}

#[async_trait]
impl CrmClient for MockCrm {
    async fn create_contact(&self, contact: &NewContact) -> Result<String, SelltionError> {
        let mut contacts = self.contacts.lock().unwrap();
        contacts.push(contact.clone());
        Ok(format!("{}", 1000 + contacts.len()))
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<Value, SelltionError> {
        self.exchanges
            .lock()
            .unwrap()
            .push((code.to_string(), redirect_uri.to_string()));
        if code != self.valid_code {
            return Err(SelltionError::Crm {
                status: 400,
                message: "auth code not found".into(),
                details: serde_json::json!({ "status": "BAD_AUTH_CODE", "message": "auth code not found" }),
            });
        }
        Ok(serde_json::json!({
            "access_token": "access",
            "refresh_token": "refresh",
            "expires_in": 1800,
            "user_id": 42,
            "scope": "crm.objects.contacts.write",
        }))
    }
}
