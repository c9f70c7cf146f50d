//! Seed data for an empty car table.
//!
//! When no snapshot has been saved yet, the table is filled once from a
//! remote endpoint. The endpoint normally answers `{ "cars": [...] }`; a bare
//! array is accepted too.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, info};

use crate::car::{self, Car};
use crate::config::Config;
use crate::error::{Error, Result};

/// A source of initial car data.
#[async_trait]
pub trait SeedSource: Send + Sync {
    /// Where the data comes from, for logging.
    fn describe(&self) -> String;

    /// Fetch the seed collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be fetched or is not a car list.
    async fn fetch(&self) -> Result<Vec<Car>>;
}

/// Extract the car list from a seed response body.
///
/// Accepts `{ "cars": [...] }` or a bare `[...]`. Entries that are not
/// usable car records are skipped; the rest are kept.
///
/// # Errors
///
/// Returns [`Error::SeedFormat`] if the body is not JSON or holds no car list.
pub fn parse_seed(body: &[u8]) -> Result<Vec<Car>> {
    let document: Value = serde_json::from_slice(body)
        .map_err(|e| Error::seed_format(format!("response is not JSON: {e}")))?;

    let list = match document {
        list @ Value::Array(_) => list,
        Value::Object(mut fields) => fields
            .remove("cars")
            .ok_or_else(|| Error::seed_format("response has no 'cars' field"))?,
        other => {
            return Err(Error::seed_format(format!(
                "expected an object or array, got {other}"
            )))
        }
    };

    let Value::Array(entries) = list else {
        return Err(Error::seed_format(format!("'cars' is not a list: {list}")));
    };
    Ok(car::cars_from_values("seed response", entries))
}

/// Fetches seed data over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSeed {
    client: Client,
    url: Url,
}

impl HttpSeed {
    /// Create a seed client for `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: Url, timeout: Option<Duration>) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("cartable/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url,
        })
    }

    /// Create a seed client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL is invalid or the client
    /// cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.seed_url()?, config.seed_timeout())
    }

    /// The endpoint this client fetches.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl SeedSource for HttpSeed {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<Vec<Car>> {
        info!("Fetching seed data from {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        debug!("Seed response: {} bytes", body.len());

        let cars = parse_seed(&body)?;
        info!("Seed returned {} cars", cars.len());
        Ok(cars)
    }
}
