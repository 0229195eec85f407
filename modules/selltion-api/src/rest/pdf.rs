use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use selltion_common::lookup::{find_document, LookupRequest};
use selltion_common::LinkClassification;

use super::json_body;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPdfRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    url_perfil: String,
    #[serde(default)]
    record_id: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckPdfResponse {
    pub success: bool,
    pub found: bool,
    #[serde(rename = "urlPDF")]
    pub url_pdf: Option<String>,
    pub drive_kind: Option<LinkClassification>,
    pub record_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl CheckPdfResponse {
    fn not_found() -> Self {
        Self {
            success: true,
            found: false,
            url_pdf: None,
            drive_kind: None,
            record_id: None,
            message: Some("PDF not available yet"),
        }
    }
}

/// `POST /api/check-pdf-url`: the best generated report for a profile.
pub async fn check_pdf_url(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CheckPdfRequest>, JsonRejection>,
) -> Result<Json<CheckPdfResponse>, ApiError> {
    let body = json_body(body)?;
    let request = LookupRequest::new(&body.email, &body.url_perfil, body.record_id.as_deref())?;
    let store = state.store()?;

    let response = match find_document(store, &request).await? {
        Some(selection) => CheckPdfResponse {
            success: true,
            found: true,
            url_pdf: Some(selection.link),
            drive_kind: Some(selection.kind),
            record_id: Some(selection.record_id),
            message: None,
        },
        None => CheckPdfResponse::not_found(),
    };

    Ok(Json(response))
}
