use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelltionError {
    /// Missing credentials or settings. Fatal for the request, reported as a server error.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The record store could not be reached (DNS, refused connection, timeout).
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Record store error: {0}")]
    Store(String),

    /// The CRM answered with a non-success status.
    #[error("CRM error (status {status}): {message}")]
    Crm {
        status: u16,
        message: String,
        details: serde_json::Value,
    },

    #[error("CRM request failed: {0}")]
    CrmTransport(String),
}
