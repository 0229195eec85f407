use serde::{Deserialize, Serialize};

/// Properties for a new CRM contact.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hs_linkedin_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateContactRequest<'a> {
    pub properties: &'a ContactProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub id: String,
}

/// OAuth app credentials used for the authorization-code grant.
#[derive(Debug, Clone)]
pub struct OAuthApp {
    pub client_id: String,
    pub client_secret: String,
}

/// Form body of `POST /oauth/v1/token`.
#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub redirect_uri: &'a str,
    pub code: &'a str,
}
