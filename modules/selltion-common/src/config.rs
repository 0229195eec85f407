use std::env;

use crate::error::SelltionError;

/// Browser extension ids allowed by default: the store release and the unpacked dev build.
pub const DEFAULT_EXTENSION_IDS: &[&str] = &[
    "eilckjfihngldoedpfdnhpponpbaphig",
    "fapmbomkbbckmnpbeecncppfbmcabmbc",
];

/// Origins allowed in addition to the extensions.
pub const STATIC_ORIGINS: &[&str] = &["http://localhost:3000", "https://backend-selltionia.vercel.app"];

const DEFAULT_TABLE_NAME: &str = "users_data";

/// Application configuration loaded from environment variables.
///
/// Third-party credentials are optional at startup: a route whose
/// credentials are missing answers with a configuration error instead of
/// keeping the whole service down.
#[derive(Debug, Clone)]
pub struct Config {
    // Airtable
    pub airtable_api_key: Option<String>,
    pub airtable_base_id: Option<String>,
    pub airtable_table_name: String,

    // HubSpot
    pub hubspot_token: Option<String>,
    pub hubspot_client_id: Option<String>,
    pub hubspot_client_secret: Option<String>,
    pub hubspot_redirect_uri: Option<String>,

    // CORS
    pub allowed_origins: Vec<String>,

    // Web server
    pub host: String,
    pub port: u16,
}

/// Everything needed to talk to the Airtable table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirtableSettings {
    pub api_key: String,
    pub base_id: String,
    pub table_name: String,
}

/// HubSpot credentials. Each operation needs a different subset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HubSpotSettings {
    pub token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, SelltionError> {
        dotenvy::dotenv().ok();

        let port = optional_env("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| SelltionError::Config("PORT must be a number".into()))?;

        let config = Self {
            airtable_api_key: optional_env("AIRTABLE_API_KEY").or_else(|| optional_env("AIRTABLE_TOKEN")),
            airtable_base_id: optional_env("AIRTABLE_BASE_ID"),
            airtable_table_name: optional_env("AIRTABLE_TABLE_NAME")
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            hubspot_token: optional_env("HUBSPOT_TOKEN"),
            hubspot_client_id: optional_env("HUBSPOT_CLIENT_ID"),
            hubspot_client_secret: optional_env("HUBSPOT_CLIENT_SECRET"),
            hubspot_redirect_uri: optional_env("HUBSPOT_REDIRECT_URI"),
            allowed_origins: allowed_origins(
                optional_env("EXTENSION_IDS").as_deref(),
                optional_env("EXTRA_ALLOWED_ORIGINS").as_deref(),
            ),
            host: optional_env("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
        };

        config.log_keys();
        Ok(config)
    }

    /// Airtable settings, or a configuration error naming what is missing.
    pub fn airtable(&self) -> Result<AirtableSettings, SelltionError> {
        match (&self.airtable_api_key, &self.airtable_base_id) {
            (Some(api_key), Some(base_id)) if !self.airtable_table_name.is_empty() => Ok(AirtableSettings {
                api_key: api_key.clone(),
                base_id: base_id.clone(),
                table_name: self.airtable_table_name.clone(),
            }),
            _ => Err(SelltionError::Config(
                "Incomplete Airtable configuration (API_KEY/TOKEN, BASE_ID, TABLE_NAME)".into(),
            )),
        }
    }

    pub fn hubspot(&self) -> HubSpotSettings {
        HubSpotSettings {
            token: self.hubspot_token.clone(),
            client_id: self.hubspot_client_id.clone(),
            client_secret: self.hubspot_client_secret.clone(),
        }
    }

    fn log_keys(&self) {
        fn state(val: &Option<String>) -> &'static str {
            if val.is_some() {
                "set"
            } else {
                "missing"
            }
        }
        tracing::info!(
            airtable_api_key = state(&self.airtable_api_key),
            airtable_base_id = state(&self.airtable_base_id),
            airtable_table = %self.airtable_table_name,
            hubspot_token = state(&self.hubspot_token),
            hubspot_oauth = state(&self.hubspot_client_secret),
            origins = self.allowed_origins.len(),
            "Configuration loaded"
        );
    }
}

/// Build the CORS allow-list: one `chrome-extension://` origin per extension
/// id (falling back to [`DEFAULT_EXTENSION_IDS`]), then [`STATIC_ORIGINS`],
/// then any extra origins. Order is kept and duplicates dropped.
pub fn allowed_origins(extension_ids: Option<&str>, extra: Option<&str>) -> Vec<String> {
    let mut ids = split_csv(extension_ids.unwrap_or_default());
    if ids.is_empty() {
        ids = DEFAULT_EXTENSION_IDS.iter().map(|s| s.to_string()).collect();
    }

    let candidates = ids
        .into_iter()
        .map(|id| format!("chrome-extension://{id}"))
        .chain(STATIC_ORIGINS.iter().map(|s| s.to_string()))
        .chain(split_csv(extra.unwrap_or_default()));

    let mut origins: Vec<String> = Vec::new();
    for origin in candidates {
        if !origins.contains(&origin) {
            origins.push(origin);
        }
    }
    origins
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// A set, non-blank environment variable.
fn optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
