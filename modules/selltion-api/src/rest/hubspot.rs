use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use selltion_common::crm::NewContact;
use selltion_common::SelltionError;

use super::json_body;
use crate::error::ApiError;
use crate::AppState;

/// `POST /api/send-to-hubspot`: create a CRM contact for a profile.
pub async fn send_to_hubspot(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewContact>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let contact = json_body(body)?;

    match state.crm.create_contact(&contact).await {
        Ok(id) => Ok(Json(json!({ "success": true, "id": id }))),
        Err(e @ SelltionError::Config(_)) => Err(e.into()),
        Err(e) => {
            warn!(error = %e, "HubSpot contact creation failed");
            Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Could not create HubSpot contact")
                .with_details(Value::String(e.to_string())))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExchangeRequest {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    redirect_uri: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// `POST /api/hubspot/exchange-token`: trade an OAuth code for tokens on
/// behalf of the extension, which never sees the client secret.
pub async fn exchange_token(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ExchangeRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = json_body(body)?;
    let (Some(code), Some(redirect_uri)) = (non_blank(body.code), non_blank(body.redirect_uri)) else {
        return Err(ApiError::bad_request("code and redirect_uri are required"));
    };

    match state.crm.exchange_code(&code, &redirect_uri).await {
        Ok(tokens) => Ok(Json(json!({ "success": true, "tokens": tokens }))),
        Err(e) => {
            warn!(error = %e, "HubSpot token exchange failed");
            Err(e.into())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
}

/// `GET /api/auth/hubspot-callback`: OAuth redirect target using the
/// configured redirect URI. Answers with the token fields only.
pub async fn hubspot_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(code) = non_blank(query.code) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing authorization code" })),
        )
            .into_response();
    };

    let Some(redirect_uri) = state.hubspot_redirect_uri.as_deref() else {
        return callback_error(Value::String("HUBSPOT_REDIRECT_URI is not configured".into()));
    };

    match state.crm.exchange_code(&code, redirect_uri).await {
        Ok(tokens) => Json(json!({
            "access_token": tokens["access_token"],
            "refresh_token": tokens["refresh_token"],
            "expires_in": tokens["expires_in"],
            "user": tokens["user_id"],
            "scope": tokens["scope"],
        }))
        .into_response(),
        Err(SelltionError::Crm { details, message, .. }) => {
            warn!(%message, "HubSpot callback exchange rejected");
            callback_error(if details.is_null() { Value::String(message) } else { details })
        }
        Err(e) => {
            warn!(error = %e, "HubSpot callback exchange failed");
            callback_error(Value::String(e.to_string()))
        }
    }
}

fn callback_error(details: Value) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Token exchange failed", "details": details })),
    )
        .into_response()
}
