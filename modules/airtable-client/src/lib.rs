pub mod error;
pub mod formula;
pub mod types;

pub use error::{AirtableError, Result};
pub use types::{ListParams, Record, RecordPage, MAX_PAGE_SIZE};

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde_json::{Map, Value};
use types::{error_message, CreateRequest, CreateResponse, NewRecord};

const BASE_URL: &str = "https://api.airtable.com/v0";

/// Client bound to a single Airtable table.
pub struct AirtableClient {
    client: reqwest::Client,
    base_url: Url,
    token: String,
    base_id: String,
    table: String,
}

impl AirtableClient {
    pub fn new(token: &str, base_id: &str, table: &str) -> Result<Self> {
        Self::with_base_url(BASE_URL, token, base_id, table)
    }

    /// Point the client at a different API root (used by tests).
    pub fn with_base_url(base_url: &str, token: &str, base_id: &str, table: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(base_url.trim_end_matches('/'))?,
            token: token.to_string(),
            base_id: base_id.to_string(),
            table: table.to_string(),
        })
    }

    /// `{base_url}/{base_id}/{table}[/{record_id}]`, each segment percent-encoded.
    fn table_url(&self, record_id: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| AirtableError::Parse("base URL cannot be a base".to_string()))?;
            segments.pop_if_empty().push(&self.base_id).push(&self.table);
            if let Some(id) = record_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Fetch a single page of records. Does not follow `offset`.
    pub async fn list_page(&self, params: &ListParams) -> Result<RecordPage> {
        let url = self.table_url(None)?;
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(&params.to_query())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AirtableError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let page: RecordPage = resp.json().await?;
        tracing::debug!(table = %self.table, count = page.records.len(), "Listed Airtable records");
        Ok(page)
    }

    /// Fetch a record by id. Missing records are reported as [`AirtableError::NotFound`].
    pub async fn get_record(&self, record_id: &str) -> Result<Record> {
        let url = self.table_url(Some(record_id))?;
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AirtableError::NotFound);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AirtableError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(resp.json().await?)
    }

    /// Create one record. `typecast` lets Airtable coerce values into field types.
    pub async fn create_record(&self, fields: &Map<String, Value>, typecast: bool) -> Result<Record> {
        let url = self.table_url(None)?;
        let body = CreateRequest {
            records: vec![NewRecord { fields }],
            typecast,
        };

        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AirtableError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let created: CreateResponse = resp.json().await?;
        let record = created
            .records
            .into_iter()
            .next()
            .ok_or_else(|| AirtableError::Parse("create response contained no records".to_string()))?;
        tracing::info!(table = %self.table, record_id = %record.id, "Created Airtable record");
        Ok(record)
    }
}
