use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use selltion_api::{build_router, AppState};
use selltion_common::config::allowed_origins;
use selltion_common::crm::MockCrm;
use selltion_common::store::{MockStore, RecordStore};
use selltion_common::CandidateRecord;

const EXTENSION_ORIGIN: &str = "chrome-extension://fapmbomkbbckmnpbeecncppfbmcabmbc";

fn rec(id: &str, email: &str, url: &str, link: Option<&str>, created: i64) -> CandidateRecord {
    CandidateRecord {
        id: id.to_string(),
        owner_email: email.to_string(),
        profile_url: url.to_string(),
        document_link: link.map(String::from),
        created_at: Some(Utc.timestamp_opt(created, 0).unwrap()),
    }
}

struct Harness {
    app: Router,
    store: Option<Arc<MockStore>>,
    crm: Arc<MockCrm>,
}

fn harness(store: Option<MockStore>, redirect_uri: Option<&str>) -> Harness {
    let store = store.map(Arc::new);
    let crm = Arc::new(MockCrm::new("good-code"));
    let state = Arc::new(AppState {
        store: store.clone().map(|s| s as Arc<dyn RecordStore>),
        crm: crm.clone(),
        hubspot_redirect_uri: redirect_uri.map(String::from),
    });
    Harness {
        app: build_router(state, &allowed_origins(None, None)),
        store,
        crm,
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// --- check-pdf-url ---

#[tokio::test]
async fn check_pdf_prefers_newest_strict_file() {
    let h = harness(
        Some(MockStore::new(vec![
            rec("old", "", "https://x.com/in/a", Some("https://drive.google.com/file/d/ID1/view"), 100),
            rec("new", "", "https://x.com/in/a", Some("https://site.com/report.pdf"), 200),
        ])),
        None,
    );

    let (status, _, body) = send(
        &h.app,
        post_json("/api/check-pdf-url", json!({ "email": "a@x.com", "urlPerfil": "https://x.com/in/a/" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "found": true,
            "urlPDF": "https://site.com/report.pdf",
            "driveKind": "file",
            "recordId": "new",
        })
    );
}

#[tokio::test]
async fn check_pdf_rewrites_drive_links_to_preview() {
    let h = harness(
        Some(MockStore::new(vec![rec(
            "r1",
            "a@x.com",
            "https://x.com/in/a",
            Some("https://drive.google.com/file/d/ABC123/view?usp=sharing"),
            1,
        )])),
        None,
    );

    let (_, _, body) = send(
        &h.app,
        post_json("/api/check-pdf-url", json!({ "email": "a@x.com", "urlPerfil": "https://x.com/in/a" })),
    )
    .await;

    assert_eq!(body["urlPDF"], "https://drive.google.com/file/d/ABC123/preview");
    assert_eq!(body["driveKind"], "file");
}

#[tokio::test]
async fn check_pdf_without_links_is_a_successful_miss() {
    let h = harness(
        Some(MockStore::new(vec![rec("r1", "a@x.com", "https://x.com/in/a", Some("not-a-url"), 1)])),
        None,
    );

    let (status, _, body) = send(
        &h.app,
        post_json("/api/check-pdf-url", json!({ "email": "a@x.com", "urlPerfil": "https://x.com/in/a" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["found"], false);
    assert_eq!(body["urlPDF"], Value::Null);
    assert_eq!(body["driveKind"], Value::Null);
    assert_eq!(body["recordId"], Value::Null);
}

#[tokio::test]
async fn check_pdf_honours_record_id() {
    let h = harness(
        Some(MockStore::new(vec![
            rec("best", "a@x.com", "https://x.com/in/a", Some("https://s.com/best.pdf"), 300),
            rec("named", "z@z.com", "https://z.com/in/z", Some("https://s.com/page"), 100),
        ])),
        None,
    );

    let (_, _, body) = send(
        &h.app,
        post_json(
            "/api/check-pdf-url",
            json!({ "email": "a@x.com", "urlPerfil": "https://x.com/in/a", "recordId": "named" }),
        ),
    )
    .await;

    assert_eq!(body["recordId"], "named");
    assert_eq!(body["urlPDF"], "https://s.com/page");
    assert_eq!(body["driveKind"], "unknown");
}

#[tokio::test]
async fn check_pdf_sends_derived_query_to_store() {
    let h = harness(Some(MockStore::new(Vec::new())), None);

    send(
        &h.app,
        post_json(
            "/api/check-pdf-url",
            json!({ "email": " a@x.com ", "urlPerfil": "https://www.linkedin.com/in/ana/?trk=1" }),
        ),
    )
    .await;

    let queries = h.store.unwrap().queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].email, "a@x.com");
    assert_eq!(queries[0].url_without_trailing_slash, "https://www.linkedin.com/in/ana");
    assert_eq!(queries[0].linkedin_handle.as_deref(), Some("ana"));
}

#[tokio::test]
async fn check_pdf_rejects_missing_fields() {
    let h = harness(Some(MockStore::new(Vec::new())), None);

    let (status, _, body) = send(&h.app, post_json("/api/check-pdf-url", json!({ "email": "a@x.com" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("urlPerfil"));
}

#[tokio::test]
async fn check_pdf_rejects_malformed_json() {
    let h = harness(Some(MockStore::new(Vec::new())), None);
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/check-pdf-url")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, _, body) = send(&h.app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn check_pdf_without_store_config_is_a_server_error() {
    let h = harness(None, None);

    let (status, _, body) = send(
        &h.app,
        post_json("/api/check-pdf-url", json!({ "email": "a@x.com", "urlPerfil": "https://x.com/in/a" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "error": "Server configuration incomplete" }));
}

#[tokio::test]
async fn check_pdf_validates_input_before_config() {
    let h = harness(None, None);
    let (status, _, _) = send(&h.app, post_json("/api/check-pdf-url", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn check_pdf_reports_unreachable_store() {
    let h = harness(Some(MockStore::new(Vec::new()).unreachable()), None);

    let (status, _, body) = send(
        &h.app,
        post_json("/api/check-pdf-url", json!({ "email": "a@x.com", "urlPerfil": "https://x.com/in/a" })),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn check_pdf_rejects_get() {
    let h = harness(Some(MockStore::new(Vec::new())), None);

    let (status, _, body) = send(&h.app, get("/api/check-pdf-url")).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["success"], false);
}

// --- append-user-data ---

#[tokio::test]
async fn append_user_data_fills_date_and_creates_record() {
    let h = harness(Some(MockStore::new(Vec::new())), None);

    let (status, _, body) = send(
        &h.app,
        post_json(
            "/api/airtable/append-user-data",
            json!({ "fields": { "UsuarioEmail": "a@x.com", "URLPerfil": "https://x.com/in/a" } }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["recordId"], "rec1");
    assert_eq!(body["fields"]["UsuarioEmail"], "a@x.com");
    assert!(body["fields"]["fecha"].as_str().unwrap().ends_with('Z'));

    let created = h.store.unwrap().created();
    assert_eq!(created.len(), 1);
    assert!(created[0].contains_key("fecha"));
}

#[tokio::test]
async fn append_user_data_requires_fields_object() {
    let h = harness(Some(MockStore::new(Vec::new())), None);

    for body in [json!({}), json!({ "fields": "nope" }), json!({ "fields": [1, 2] })] {
        let (status, _, resp) = send(&h.app, post_json("/api/airtable/append-user-data", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["success"], false);
    }
    assert!(h.store.unwrap().created().is_empty());
}

// --- HubSpot ---

#[tokio::test]
async fn send_to_hubspot_creates_contact() {
    let h = harness(None, None);

    let (status, _, body) = send(
        &h.app,
        post_json(
            "/api/send-to-hubspot",
            json!({ "nombre": "Ana", "apellido": "Ruiz", "linkedin_url": "https://linkedin.com/in/ana" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "id": "1001" }));
    let contacts = h.crm.contacts();
    assert_eq!(contacts[0].first_name.as_deref(), Some("Ana"));
    assert_eq!(contacts[0].last_name.as_deref(), Some("Ruiz"));
}

#[tokio::test]
async fn exchange_token_requires_code_and_redirect() {
    let h = harness(None, None);

    let (status, _, body) =
        send(&h.app, post_json("/api/hubspot/exchange-token", json!({ "code": "good-code" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(h.crm.exchanges().is_empty());
}

#[tokio::test]
async fn exchange_token_returns_tokens() {
    let h = harness(None, None);

    let (status, _, body) = send(
        &h.app,
        post_json(
            "/api/hubspot/exchange-token",
            json!({ "code": "good-code", "redirect_uri": "https://ext.example/cb" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["tokens"]["access_token"], "access");
    assert_eq!(
        h.crm.exchanges(),
        vec![("good-code".to_string(), "https://ext.example/cb".to_string())]
    );
}

#[tokio::test]
async fn exchange_token_passes_upstream_failure_through() {
    let h = harness(None, None);

    let (status, _, body) = send(
        &h.app,
        post_json(
            "/api/hubspot/exchange-token",
            json!({ "code": "stale", "redirect_uri": "https://ext.example/cb" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "auth code not found");
    assert_eq!(body["details"]["status"], "BAD_AUTH_CODE");
}

#[tokio::test]
async fn callback_requires_code() {
    let h = harness(None, Some("https://api.example/cb"));

    let (status, _, body) = send(&h.app, get("/api/auth/hubspot-callback")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing authorization code" }));
}

#[tokio::test]
async fn callback_exchanges_with_configured_redirect() {
    let h = harness(None, Some("https://api.example/cb"));

    let (status, _, body) = send(&h.app, get("/api/auth/hubspot-callback?code=good-code")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "access_token": "access",
            "refresh_token": "refresh",
            "expires_in": 1800,
            "user": 42,
            "scope": "crm.objects.contacts.write",
        })
    );
    assert_eq!(h.crm.exchanges()[0].1, "https://api.example/cb");
}

#[tokio::test]
async fn callback_without_redirect_config_fails() {
    let h = harness(None, None);

    let (status, _, body) = send(&h.app, get("/api/auth/hubspot-callback?code=good-code")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Token exchange failed");
    assert!(h.crm.exchanges().is_empty());
}

#[tokio::test]
async fn callback_rejects_post_with_json() {
    let h = harness(None, Some("https://app.example.com/callback"));

    let (status, _, body) = send(
        &h.app,
        post_json("/api/auth/hubspot-callback?code=good-code", json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["success"], false);
    assert!(h.crm.exchanges().is_empty());
}

// --- cross-cutting ---

#[tokio::test]
async fn health_check_answers_ok() {
    let h = harness(None, None);
    let resp = h.app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn preflight_from_extension_is_allowed() {
    let h = harness(None, None);
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/check-pdf-url")
        .header(header::ORIGIN, EXTENSION_ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let (status, headers, _) = send(&h.app, req).await;

    assert!(status.is_success());
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], EXTENSION_ORIGIN);
    assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
}

#[tokio::test]
async fn unknown_origin_gets_no_allow_origin() {
    let h = harness(Some(MockStore::new(Vec::new())), None);
    let mut req = post_json("/api/check-pdf-url", json!({ "email": "a@x.com", "urlPerfil": "https://x.com/in/a" }));
    req.headers_mut()
        .insert(header::ORIGIN, "https://evil.example".parse().unwrap());

    let (status, headers, _) = send(&h.app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn responses_are_not_cacheable() {
    let h = harness(None, None);
    let (_, headers, _) = send(&h.app, get("/")).await;
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
}
