// Record store port.
//
// The lookup flow talks to the store through this trait only. Production
// wires in an Airtable-backed store; tests use MockStore.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::SelltionError;
use crate::types::{CandidateRecord, StoredRecord};

/// Upper bound on records fetched for one lookup.
pub const MAX_CANDIDATES: usize = 100;

/// Criteria for the single broad candidate query: the owner's email, or a
/// profile URL containing any of the URL variants or the LinkedIn handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
    pub email: String,
    pub url_without_trailing_slash: String,
    pub url_with_trailing_slash: String,
    pub linkedin_handle: Option<String>,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// One bounded page (at most [`MAX_CANDIDATES`]) of records matching `query`.
    async fn query(&self, query: &CandidateQuery) -> Result<Vec<CandidateRecord>, SelltionError>;

    /// `Ok(None)` when the id does not exist.
    async fn find_by_id(&self, id: &str) -> Result<Option<CandidateRecord>, SelltionError>;

    async fn create(&self, fields: Map<String, Value>) -> Result<StoredRecord, SelltionError>;
}

// ---------------------------------------------------------------------------
// MockStore (for tests)
// ---------------------------------------------------------------------------

/// In-memory store. `query` returns every record regardless of criteria, so
/// tests exercise the resolver's own filtering.
#[derive(Default)]
pub struct MockStore {
    records: Vec<CandidateRecord>,
    by_id: Vec<CandidateRecord>,
    fail_query: bool,
    fail_find: bool,
    queries: Mutex<Vec<CandidateQuery>>,
    lookups: Mutex<Vec<String>>,
    created: Mutex<Vec<Map<String, Value>>>,
}

impl MockStore {
    pub fn new(records: Vec<CandidateRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Records only reachable through `find_by_id`.
    pub fn with_hidden(mut self, records: Vec<CandidateRecord>) -> Self {
        self.by_id = records;
        self
    }

    /// Make `query` fail as if the store were unreachable.
    pub fn unreachable(mut self) -> Self {
        self.fail_query = true;
        self
    }

    /// Make `find_by_id` fail.
    pub fn failing_lookups(mut self) -> Self {
        self.fail_find = true;
        self
    }

    pub fn queries(&self) -> Vec<CandidateQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<Map<String, Value>> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn query(&self, query: &CandidateQuery) -> Result<Vec<CandidateRecord>, SelltionError> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail_query {
            return Err(SelltionError::StoreUnavailable("connection refused".into()));
        }
        Ok(self.records.iter().take(MAX_CANDIDATES).cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CandidateRecord>, SelltionError> {
        self.lookups.lock().unwrap().push(id.to_string());
        if self.fail_find {
            return Err(SelltionError::Store("lookup failed".into()));
        }
        Ok(self
            .records
            .iter()
            .chain(self.by_id.iter())
            .find(|r| r.id == id)
            .cloned())
    }

    async fn create(&self, fields: Map<String, Value>) -> Result<StoredRecord, SelltionError> {
        let mut created = self.created.lock().unwrap();
        created.push(fields.clone());
        Ok(StoredRecord {
            id: format!("rec{}", created.len()),
            fields,
        })
    }
}
