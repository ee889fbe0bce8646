//! Where seed records come from.

use std::future::Future;

use serde_json::Value;

use crate::Error;

use super::SeedConfig;

/// A supplier of raw, unvalidated sale records.
pub trait SeedSource {
    /// Fetch every candidate record.
    ///
    /// # Errors
    /// Returns [Error::SeedFetch] if the records cannot be retrieved or are
    /// not a JSON array.
    fn fetch(&self) -> impl Future<Output = Result<Vec<Value>, Error>> + Send;
}

/// Fetches seed records from an HTTP(S) endpoint that returns a JSON array.
#[derive(Debug, Clone)]
pub struct HttpSeedSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSeedSource {
    /// Create a source for `config.url` whose requests give up after
    /// `config.timeout`.
    ///
    /// # Errors
    /// Returns [Error::SeedFetch] if the HTTP client cannot be built.
    pub fn new(config: &SeedConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

impl SeedSource for HttpSeedSource {
    async fn fetch(&self) -> Result<Vec<Value>, Error> {
        tracing::debug!("fetching seed data from {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(Error::SeedFetch(format!(
                "seed source responded with {}",
                response.status()
            )));
        }

        match response.json::<Value>().await? {
            Value::Array(records) => Ok(records),
            _ => Err(Error::SeedFetch(
                "seed source did not return a JSON array".to_owned(),
            )),
        }
    }
}
