//! Best-match resolution of a profile's generated document among duplicate records.
//!
//! The record store can hold several rows for the same profile: re-submissions,
//! rows keyed by a slightly different URL, rows whose link points at a Drive
//! folder instead of the report itself. [`resolve`] ranks every candidate with a
//! [`MatchTier`] and returns the best one, preferring an actual file over any
//! other link.
//!
//! Everything here is pure and synchronous; fetching candidates is the caller's job.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::types::{CandidateRecord, LinkClassification, MatchTier, Selection, SelectionReason};

// =============================================================================
// Link patterns
// =============================================================================

static HTTP_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("valid regex"));

static DRIVE_HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:drive|docs)\.google\.com/").expect("valid regex")
});

static DRIVE_FOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)drive\.google\.com/(?:drive/folders|folders|folder/d)/").expect("valid regex")
});

/// `/file/d/{id}` as in `.../file/d/{id}/view`.
static DRIVE_FILE_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/file/d/([^/?&#]+)").expect("valid regex"));

/// `?id={id}` as in `open?id=` and `uc?id=`.
static DRIVE_ID_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]id=([^&#]+)").expect("valid regex"));

static DRIVE_VIEW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)drive\.google\.com/.*/view(?:[?#]|$)").expect("valid regex")
});

static VIEW_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/view([?#]|$)").expect("valid regex"));

// =============================================================================
// URL normalization
// =============================================================================

/// Reduce a profile URL to lower-cased `scheme://host[:port]/path` with query,
/// fragment and trailing slashes removed.
///
/// Input that is not an absolute http(s) URL falls back to the same treatment
/// applied to the literal string, so this never fails. When that literal
/// treatment leaves a parseable http(s) URL (junk after a space, say), the URL
/// form of what is left is returned. The result is a fixed point: normalizing
/// it again returns it unchanged.
pub fn normalize_profile_url(input: &str) -> String {
    let trimmed = input.trim();
    if let Some(normalized) = normalize_http(trimmed) {
        return normalized;
    }
    let literal = normalize_literal(trimmed);
    normalize_http(&literal).unwrap_or(literal)
}

fn normalize_http(input: &str) -> Option<String> {
    let url = Url::parse(input).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    let origin = url.origin().ascii_serialization();
    let path = url.path().trim_end_matches('/');
    Some(format!("{origin}{path}").to_lowercase())
}

fn normalize_literal(input: &str) -> String {
    let without_query = input.split(['?', '#']).next().unwrap_or_default();
    without_query
        .trim_end_matches(|c: char| c == '/' || c.is_whitespace())
        .to_lowercase()
}

/// Whether two normalized URLs are equal.
fn strict_match(candidate: &str, target: &str) -> bool {
    !target.is_empty() && candidate == target
}

/// Whether either normalized URL is a prefix of the other. Blank URLs never match.
fn loose_match(candidate: &str, target: &str) -> bool {
    if candidate.is_empty() || target.is_empty() {
        return false;
    }
    candidate.starts_with(target) || target.starts_with(candidate)
}

// =============================================================================
// Link classification
// =============================================================================

/// Whether a document link is an absolute http(s) URL.
pub fn is_http_link(link: &str) -> bool {
    HTTP_LINK_RE.is_match(link.trim())
}

/// Extract a Google Drive file id from a share, open or download link.
pub fn drive_file_id(link: &str) -> Option<&str> {
    if !DRIVE_HOST_RE.is_match(link) {
        return None;
    }
    DRIVE_FILE_PATH_RE
        .captures(link)
        .or_else(|| DRIVE_ID_PARAM_RE.captures(link))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn is_drive_folder(link: &str) -> bool {
    DRIVE_FOLDER_RE.is_match(link)
}

fn path_ends_with_pdf(link: &str) -> bool {
    let path = match Url::parse(link.trim()) {
        Ok(url) => url.path().to_string(),
        Err(_) => link.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    path.to_ascii_lowercase().ends_with(".pdf")
}

/// Classify what a document link points at.
pub fn classify(link: &str) -> LinkClassification {
    if is_drive_folder(link) {
        LinkClassification::Folder
    } else if drive_file_id(link).is_some() || path_ends_with_pdf(link) {
        LinkClassification::File
    } else {
        LinkClassification::Unknown
    }
}

/// Rewrite a Drive link into its inline-preview form.
///
/// - a link carrying a file id becomes `https://drive.google.com/file/d/{id}/preview`
/// - a Drive `.../view` link gets its `view` segment replaced by `preview`
/// - anything else is returned unchanged
pub fn to_preview_link(link: &str) -> String {
    if let Some(id) = drive_file_id(link) {
        return format!("https://drive.google.com/file/d/{id}/preview");
    }
    if DRIVE_VIEW_RE.is_match(link) {
        return VIEW_SEGMENT_RE.replace(link, "/preview$1").into_owned();
    }
    link.to_string()
}

// =============================================================================
// Resolution
// =============================================================================

/// Order candidates most recent first. Stable, so equal timestamps keep the
/// caller's order; records without a timestamp go last.
pub fn sort_most_recent_first(candidates: &mut [CandidateRecord]) {
    candidates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

struct Target {
    email: String,
    profile_url: String,
}

impl Target {
    fn new(email: &str, profile_url: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            profile_url: normalize_profile_url(profile_url),
        }
    }

    fn owns(&self, candidate: &CandidateRecord) -> bool {
        !self.email.is_empty() && candidate.owner_email.trim().eq_ignore_ascii_case(&self.email)
    }

    fn tier(&self, candidate: &CandidateRecord, link: &str) -> MatchTier {
        let profile = normalize_profile_url(&candidate.profile_url);
        let strict = strict_match(&profile, &self.profile_url);
        let loose = strict || loose_match(&profile, &self.profile_url);
        let owned = self.owns(candidate);
        let file = classify(link) == LinkClassification::File;

        match (file, strict, loose, owned) {
            (true, true, _, _) => MatchTier::StrictFile,
            (true, _, true, _) => MatchTier::LooseFile,
            (true, _, _, true) => MatchTier::AnyFile,
            (_, true, _, _) => MatchTier::StrictAny,
            (_, _, true, _) => MatchTier::LooseAny,
            (_, _, _, true) => MatchTier::AnyAny,
            _ => MatchTier::NoMatch,
        }
    }
}

/// Rank a single candidate against a target. Candidates without an http(s)
/// link are always [`MatchTier::NoMatch`].
pub fn match_tier(candidate: &CandidateRecord, target_email: &str, target_profile_url: &str) -> MatchTier {
    match candidate.link().filter(|l| is_http_link(l)) {
        Some(link) => Target::new(target_email, target_profile_url).tier(candidate, link),
        None => MatchTier::NoMatch,
    }
}

fn select(candidate: &CandidateRecord, link: &str, reason: SelectionReason) -> Selection {
    Selection {
        record_id: candidate.id.clone(),
        link: to_preview_link(link),
        kind: classify(link),
        reason,
    }
}

/// Pick the best record for a profile.
///
/// `candidates` must already be ordered most recent first (see
/// [`sort_most_recent_first`]); among equally ranked candidates the earliest
/// one wins. When `record_id` names a candidate that carries a link, that
/// candidate is returned without looking at emails or URLs.
///
/// Returns `None` when nothing qualifies. That is a normal outcome.
pub fn resolve(
    candidates: &[CandidateRecord],
    target_email: &str,
    target_profile_url: &str,
    record_id: Option<&str>,
) -> Option<Selection> {
    if let Some(id) = record_id.map(str::trim).filter(|id| !id.is_empty()) {
        let named = candidates
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.link().map(|link| (c, link)));
        if let Some((candidate, link)) = named {
            return Some(select(candidate, link, SelectionReason::RecordId));
        }
    }

    let target = Target::new(target_email, target_profile_url);

    candidates
        .iter()
        .filter_map(|c| {
            let link = c.link().filter(|l| is_http_link(l))?;
            Some((target.tier(c, link), c, link))
        })
        .filter(|(tier, _, _)| *tier != MatchTier::NoMatch)
        .min_by_key(|(tier, _, _)| *tier)
        .map(|(tier, candidate, link)| select(candidate, link, SelectionReason::Tier(tier)))
}
