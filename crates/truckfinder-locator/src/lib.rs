//! Nearby food truck search.
//!
//! The pipeline is: reference point (given, or acquired through
//! [`LocationAcquirer`]) → cached raw dataset ([`RawDatasetCache`]) →
//! [`parse_raw_food_truck`] → [`within_radius`] → [`sort_by_distance`].
//! [`Locator`] drives it end to end.

pub mod acquire;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod locator;
pub mod parse;
pub mod sort;

pub use acquire::{
    FixedLocation, LocationAcquirer, LocationCapability, LocationError, LocationState,
    PositionError,
};
pub use dataset::{Clock, DatasetClient, DatasetSource, RawDatasetCache, SystemClock};
pub use error::DatasetError;
pub use filter::{filter_by_food_item, within_radius};
pub use locator::{Locator, SearchRequest, DEFAULT_RADIUS_MILES};
pub use parse::{parse_raw_food_truck, parse_raw_food_trucks};
pub use sort::sort_by_distance;
