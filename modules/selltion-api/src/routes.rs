use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::rest::{self, method_not_allowed};
use crate::AppState;

pub fn build_router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter(|o| o.as_str() != "*")
        .filter_map(|o| o.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .max_age(Duration::from_secs(86400));

    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        .route(
            "/api/check-pdf-url",
            post(rest::pdf::check_pdf_url).fallback(method_not_allowed),
        )
        .route(
            "/api/airtable/append-user-data",
            post(rest::airtable::append_user_data).fallback(method_not_allowed),
        )
        .route(
            "/api/send-to-hubspot",
            post(rest::hubspot::send_to_hubspot).fallback(method_not_allowed),
        )
        .route(
            "/api/hubspot/exchange-token",
            post(rest::hubspot::exchange_token).fallback(method_not_allowed),
        )
        .route(
            "/api/auth/hubspot-callback",
            get(rest::hubspot::hubspot_callback).fallback(method_not_allowed),
        )
        .with_state(state)
        .layer(cors)
        // Lookup answers change as reports are generated
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Method + path only: bodies and query strings carry emails and OAuth codes
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}
