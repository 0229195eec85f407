use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// --- Record store types ---

/// A record fetched from the record store, as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: String,
    #[serde(default)]
    pub owner_email: String,
    #[serde(default)]
    pub profile_url: String,
    #[serde(default)]
    pub document_link: Option<String>,
    /// Only used to order candidates, most recent first. `None` sorts last.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl CandidateRecord {
    /// The document link when it is present and not blank.
    pub fn link(&self) -> Option<&str> {
        self.document_link
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

/// A record written through the store's create path.
#[derive(Debug, Clone, Serialize)]
pub struct StoredRecord {
    pub id: String,
    pub fields: Map<String, Value>,
}

// --- Resolution types ---

/// What a document link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkClassification {
    File,
    Folder,
    Unknown,
}

impl std::fmt::Display for LinkClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkClassification::File => write!(f, "file"),
            LinkClassification::Folder => write!(f, "folder"),
            LinkClassification::Unknown => write!(f, "unknown"),
        }
    }
}

/// Preference order of a candidate, most preferred first.
///
/// Strict: normalized profile URLs are equal. Loose: one is a prefix of the
/// other. Any: the owner email matches, whatever the URL. The suffix says
/// whether the link classified as a file or merely exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    StrictFile,
    LooseFile,
    AnyFile,
    StrictAny,
    LooseAny,
    AnyAny,
    NoMatch,
}

/// Why a record was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "by", content = "tier")]
pub enum SelectionReason {
    /// The caller named the record explicitly.
    RecordId,
    Tier(MatchTier),
}

/// The record chosen for a profile, with its link already rewritten for preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub record_id: String,
    pub link: String,
    pub kind: LinkClassification,
    pub reason: SelectionReason,
}
