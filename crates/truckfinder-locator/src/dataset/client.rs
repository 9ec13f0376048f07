use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use truckfinder_core::{AppConfig, RawFoodTruck};

use super::DatasetSource;
use crate::error::DatasetError;

/// HTTP client for the upstream permit dataset.
///
/// Issues a single `GET` against a fixed resource URL. The dataset is small
/// enough to be fetched whole, so there is no paging and no retry: a failure
/// is reported to the caller, which decides whether stale data is good enough.
pub struct DatasetClient {
    client: Client,
    url: Url,
}

impl DatasetClient {
    /// Creates a client for `url` with the given timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidUrl`] if `url` does not parse, or
    /// [`DatasetError::UpstreamUnavailable`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, DatasetError> {
        let parsed = Url::parse(url).map_err(|e| DatasetError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs(timeout_secs)))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            url: parsed,
        })
    }

    /// Creates a client from the dataset settings in [`AppConfig`].
    ///
    /// # Errors
    ///
    /// See [`DatasetClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, DatasetError> {
        Self::new(
            &config.dataset_url,
            config.dataset_timeout_secs,
            &config.user_agent,
        )
    }

    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Fetches every record from the upstream endpoint.
    ///
    /// Array elements that are not JSON objects are skipped; anything else
    /// about a record is left for the parser to judge.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::UpstreamUnavailable`] on network or TLS failure.
    /// - [`DatasetError::UnexpectedStatus`] on any non-2xx response.
    /// - [`DatasetError::Deserialize`] if the body is not a JSON array.
    pub async fn fetch_raw_food_trucks(&self) -> Result<Vec<RawFoodTruck>, DatasetError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DatasetError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.url.to_string(),
            });
        }

        let body = response.text().await?;
        let rows = serde_json::from_str::<Vec<serde_json::Value>>(&body).map_err(|e| {
            DatasetError::Deserialize {
                context: format!("food truck dataset from {}", self.url),
                source: e,
            }
        })?;

        let total = rows.len();
        let records: Vec<RawFoodTruck> = rows
            .into_iter()
            .filter_map(RawFoodTruck::from_value)
            .collect();

        if records.len() < total {
            tracing::debug!(
                skipped = total - records.len(),
                total,
                "skipped non-object rows in food truck dataset"
            );
        }

        Ok(records)
    }
}

/// Connecting gets at most 10 seconds, and never more than the whole request.
fn connect_timeout_secs(timeout_secs: u64) -> u64 {
    timeout_secs.min(10)
}

#[async_trait]
impl DatasetSource for DatasetClient {
    async fn fetch(&self) -> Result<Vec<RawFoodTruck>, DatasetError> {
        self.fetch_raw_food_trucks().await
    }
}
