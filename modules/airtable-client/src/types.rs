use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Airtable never returns more than 100 records per page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A single Airtable record as returned by the REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(rename = "createdTime", default)]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// String value of a field; `None` when absent or not a string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// One page of `GET /v0/{base}/{table}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub records: Vec<Record>,
    /// Cursor for the next page. Present only when more records exist.
    #[serde(default)]
    pub offset: Option<String>,
}

/// Parameters for listing a single page of records.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub filter_by_formula: Option<String>,
    /// Restrict returned fields. Empty means all fields.
    pub fields: Vec<String>,
    pub page_size: Option<u32>,
}

impl ListParams {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(ref formula) = self.filter_by_formula {
            query.push(("filterByFormula", formula.clone()));
        }
        for field in &self.fields {
            query.push(("fields[]", field.clone()));
        }
        if let Some(size) = self.page_size {
            query.push(("pageSize", size.clamp(1, MAX_PAGE_SIZE).to_string()));
        }
        query
    }
}

/// Body of `POST /v0/{base}/{table}`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateRequest<'a> {
    pub records: Vec<NewRecord<'a>>,
    pub typecast: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewRecord<'a> {
    pub fields: &'a Map<String, Value>,
}

/// Body of a create response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreateResponse {
    #[serde(default)]
    pub records: Vec<Record>,
}

/// Pull a human-readable message out of an Airtable error body.
///
/// Airtable uses both `{"error": "NOT_FOUND"}` and
/// `{"error": {"type": "...", "message": "..."}}`.
pub(crate) fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));
    match error {
        Some(Value::String(code)) => code.clone(),
        Some(Value::Object(obj)) => obj
            .get("message")
            .or_else(|| obj.get("type"))
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| body.to_string()),
        _ => body.to_string(),
    }
}
