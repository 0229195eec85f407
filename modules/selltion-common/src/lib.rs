pub mod config;
pub mod crm;
pub mod error;
pub mod lookup;
pub mod resolver;
pub mod store;
pub mod types;

pub use config::{AirtableSettings, Config, HubSpotSettings};
pub use error::SelltionError;
pub use types::*;
