//! Seeding the sale store from an external JSON document.
//!
//! A re-seed fetches every candidate record, drops the invalid ones and
//! replaces the whole store with the rest.

use std::time::Duration;

mod initialize_endpoint;
mod loader;
mod source;
mod validate;

pub use initialize_endpoint::initialize_endpoint;

/// The seed document used when no other source is configured.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// Where seed data comes from and how long to wait for it.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// The HTTP(S) URL of a JSON array of sale records.
    pub url: String,
    /// How long a fetch may take before it is abandoned.
    pub timeout: Duration,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SEED_URL.to_owned(),
            timeout: Duration::from_secs(30),
        }
    }
}
