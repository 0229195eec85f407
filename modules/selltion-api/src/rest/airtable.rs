use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::json_body;
use crate::error::ApiError;
use crate::AppState;

/// Submission timestamp column, filled in when the extension leaves it out.
const FIELD_DATE: &str = "fecha";

#[derive(Debug, Deserialize)]
pub struct AppendRequest {
    #[serde(default)]
    fields: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendResponse {
    pub success: bool,
    pub record_id: String,
    pub fields: Map<String, Value>,
}

/// Set `fecha` to `now` unless it already holds a value.
pub fn ensure_date(fields: &mut Map<String, Value>, now: DateTime<Utc>) {
    let missing = match fields.get(FIELD_DATE) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    };
    if missing {
        fields.insert(
            FIELD_DATE.to_string(),
            Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
    }
}

/// `POST /api/airtable/append-user-data`: store one submission from the extension.
pub async fn append_user_data(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AppendRequest>, JsonRejection>,
) -> Result<Json<AppendResponse>, ApiError> {
    let body = json_body(body)?;
    let mut fields = match body.fields {
        Some(Value::Object(fields)) => fields,
        _ => return Err(ApiError::bad_request("Invalid body: expected { fields: { ... } }")),
    };
    let store = state.store()?;

    ensure_date(&mut fields, Utc::now());
    let record = store.create(fields).await?;

    Ok(Json(AppendResponse {
        success: true,
        record_id: record.id,
        fields: record.fields,
    }))
}
