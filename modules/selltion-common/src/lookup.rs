//! Document lookup for a profile: query the store, then resolve.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::SelltionError;
use crate::resolver::{resolve, sort_most_recent_first};
use crate::store::{CandidateQuery, RecordStore};
use crate::types::Selection;

static LINKEDIN_HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)linkedin\.com/in/([^/?#]+)").expect("valid regex"));

/// Public profile handle from a `linkedin.com/in/{handle}` URL.
pub fn linkedin_handle(url: &str) -> Option<&str> {
    LINKEDIN_HANDLE_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

impl CandidateQuery {
    /// Derive the store query for a target. The URL variants cover records
    /// saved with and without a trailing slash.
    pub fn for_target(email: &str, profile_url: &str) -> Self {
        let without_query = profile_url.split('?').next().unwrap_or_default().trim();
        let without_slash = without_query.trim_end_matches('/');
        Self {
            email: email.trim().to_string(),
            url_without_trailing_slash: without_slash.to_string(),
            url_with_trailing_slash: format!("{without_slash}/"),
            linkedin_handle: linkedin_handle(profile_url).map(String::from),
        }
    }
}

/// A validated lookup request.
#[derive(Debug, Clone)]
pub struct LookupRequest {
    pub email: String,
    pub profile_url: String,
    pub record_id: Option<String>,
}

impl LookupRequest {
    /// Trim inputs and reject a blank email or profile URL.
    pub fn new(email: &str, profile_url: &str, record_id: Option<&str>) -> Result<Self, SelltionError> {
        let email = email.trim();
        let profile_url = profile_url.trim();
        if email.is_empty() || profile_url.is_empty() {
            return Err(SelltionError::InvalidInput(
                "Missing parameters: email and urlPerfil".into(),
            ));
        }
        Ok(Self {
            email: email.to_string(),
            profile_url: profile_url.to_string(),
            record_id: record_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from),
        })
    }
}

/// Find the best document for a profile.
///
/// Fetches one page of candidates, orders them most recent first and, when a
/// record id was supplied but is not on that page, fetches it separately. A
/// failing by-id fetch only costs the short circuit; the heuristic still runs.
/// `Ok(None)` means nothing usable exists yet.
pub async fn find_document(
    store: &dyn RecordStore,
    request: &LookupRequest,
) -> Result<Option<Selection>, SelltionError> {
    let query = CandidateQuery::for_target(&request.email, &request.profile_url);
    let mut candidates = store.query(&query).await?;
    debug!(count = candidates.len(), "Fetched candidate records");

    sort_most_recent_first(&mut candidates);

    if let Some(ref id) = request.record_id {
        if !candidates.iter().any(|c| &c.id == id) {
            match store.find_by_id(id).await {
                Ok(Some(record)) => candidates.push(record),
                Ok(None) => debug!(record_id = %id, "Named record not found"),
                Err(e) => warn!(record_id = %id, error = %e, "Named record lookup failed, using heuristic"),
            }
        }
    }

    let selection = resolve(
        &candidates,
        &request.email,
        &request.profile_url,
        request.record_id.as_deref(),
    );

    match selection {
        Some(ref sel) => info!(
            record_id = %sel.record_id,
            kind = %sel.kind,
            reason = ?sel.reason,
            "Document found"
        ),
        None => info!(candidates = candidates.len(), "No document available yet"),
    }

    Ok(selection)
}
