use airtable_client::{formula, AirtableClient, AirtableError, ListParams, Record};
use async_trait::async_trait;
use serde_json::{Map, Value};

use selltion_common::store::{CandidateQuery, RecordStore, MAX_CANDIDATES};
use selltion_common::{AirtableSettings, CandidateRecord, SelltionError, StoredRecord};

/// Owner email column.
pub const FIELD_EMAIL: &str = "UsuarioEmail";
/// Profile URL column.
pub const FIELD_PROFILE_URL: &str = "URLPerfil";
/// Generated report link column.
pub const FIELD_DOCUMENT_LINK: &str = "URL_informePDF";

/// [`RecordStore`] over one Airtable table.
pub struct AirtableStore {
    client: AirtableClient,
}

impl AirtableStore {
    pub fn new(client: AirtableClient) -> Self {
        Self { client }
    }

    pub fn from_settings(settings: &AirtableSettings) -> Result<Self, SelltionError> {
        let client = AirtableClient::new(&settings.api_key, &settings.base_id, &settings.table_name)
            .map_err(store_error)?;
        Ok(Self::new(client))
    }
}

/// `OR` of the email equality and the profile URL searches.
pub fn candidate_formula(query: &CandidateQuery) -> String {
    let handle_clause = match query.linkedin_handle {
        Some(ref handle) => formula::field_contains(FIELD_PROFILE_URL, handle),
        None => "FALSE()".to_string(),
    };
    formula::or(&[
        formula::field_equals(FIELD_EMAIL, &query.email),
        formula::field_contains(FIELD_PROFILE_URL, &query.url_without_trailing_slash),
        formula::field_contains(FIELD_PROFILE_URL, &query.url_with_trailing_slash),
        handle_clause,
    ])
}

pub fn candidate_from_record(record: Record) -> CandidateRecord {
    CandidateRecord {
        owner_email: record.str_field(FIELD_EMAIL).unwrap_or_default().to_string(),
        profile_url: record.str_field(FIELD_PROFILE_URL).unwrap_or_default().to_string(),
        document_link: record.str_field(FIELD_DOCUMENT_LINK).map(String::from),
        created_at: record.created_time,
        id: record.id,
    }
}

fn store_error(err: AirtableError) -> SelltionError {
    match err {
        AirtableError::Unreachable(detail) => SelltionError::StoreUnavailable(detail),
        other => SelltionError::Store(other.to_string()),
    }
}

#[async_trait]
impl RecordStore for AirtableStore {
    async fn query(&self, query: &CandidateQuery) -> Result<Vec<CandidateRecord>, SelltionError> {
        let params = ListParams {
            filter_by_formula: Some(candidate_formula(query)),
            fields: vec![
                FIELD_EMAIL.to_string(),
                FIELD_PROFILE_URL.to_string(),
                FIELD_DOCUMENT_LINK.to_string(),
            ],
            page_size: Some(MAX_CANDIDATES as u32),
        };
        let page = self.client.list_page(&params).await.map_err(store_error)?;
        Ok(page.records.into_iter().map(candidate_from_record).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CandidateRecord>, SelltionError> {
        match self.client.get_record(id).await {
            Ok(record) => Ok(Some(candidate_from_record(record))),
            Err(AirtableError::NotFound) => Ok(None),
            Err(e) => Err(store_error(e)),
        }
    }

    async fn create(&self, fields: Map<String, Value>) -> Result<StoredRecord, SelltionError> {
        let record = self
            .client
            .create_record(&fields, true)
            .await
            .map_err(store_error)?;
        // Airtable omits empty cells; fall back to what was sent.
        let stored_fields = if record.fields.is_empty() {
            fields
        } else {
            record.fields
        };
        Ok(StoredRecord {
            id: record.id,
            fields: stored_fields,
        })
    }
}
