pub mod airtable;
pub mod hubspot;
pub mod pdf;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::ApiError;

/// Unwrap a JSON body, turning extractor rejections into the JSON error shape.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(format!("Invalid JSON body: {}", rejection.body_text())))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
