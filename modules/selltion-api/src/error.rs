use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{error, warn};

use selltion_common::SelltionError;

/// Error answer of the JSON endpoints: `{ success: false, error, details? }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<SelltionError> for ApiError {
    fn from(err: SelltionError) -> Self {
        match err {
            SelltionError::Config(detail) => {
                error!(%detail, "Server configuration incomplete");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Server configuration incomplete")
            }
            SelltionError::InvalidInput(message) => Self::bad_request(message),
            SelltionError::StoreUnavailable(detail) => {
                warn!(%detail, "Record store unreachable");
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "Could not reach the record store")
            }
            SelltionError::Store(message) => {
                warn!(%message, "Record store error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            SelltionError::Crm {
                status,
                message,
                details,
            } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                Self::new(status, message).with_details(details)
            }
            SelltionError::CrmTransport(message) => {
                warn!(%message, "CRM request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({
            "success": false,
            "error": self.message,
        });
        if let (Some(details), Some(obj)) = (self.details, body.as_object_mut()) {
            obj.insert("details".to_string(), details);
        }
        (self.status, Json(body)).into_response()
    }
}
