//! Retrieval of the raw permit dataset and its process-wide cache.

mod cache;
mod client;

use async_trait::async_trait;
use truckfinder_core::RawFoodTruck;

use crate::error::DatasetError;

pub use cache::{Clock, RawDatasetCache, SystemClock};
pub use client::DatasetClient;

/// Something that can produce the full raw dataset in one call.
///
/// [`DatasetClient`] is the HTTP implementation; tests substitute in-memory
/// sources.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RawFoodTruck>, DatasetError>;
}
