//! Bindings of the third-party REST clients onto the domain ports.

pub mod airtable_store;
pub mod hubspot_crm;

pub use airtable_store::AirtableStore;
pub use hubspot_crm::HubSpotCrm;
