//! End-to-end nearby search.

use std::sync::Arc;

use serde::Serialize;
use truckfinder_core::{Coordinate, FoodTruck};

use crate::acquire::LocationAcquirer;
use crate::dataset::RawDatasetCache;
use crate::filter::within_radius;
use crate::parse::parse_raw_food_trucks;
use crate::sort::sort_by_distance;

pub const DEFAULT_RADIUS_MILES: f64 = 1.0;

/// An explicit search around a known point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchRequest {
    pub reference: Coordinate,
    /// Negative values are treated as zero.
    pub radius_miles: f64,
}

/// Runs the nearby pipeline: reference point → cached dataset → parse →
/// radius filter → nearest-first sort.
///
/// Failures never escape as errors. An unavailable dataset or an
/// unobtainable location yields an empty result; the location failure itself
/// stays readable on [`Locator::acquirer`].
pub struct Locator {
    cache: Arc<RawDatasetCache>,
    acquirer: Arc<LocationAcquirer>,
    default_radius_miles: f64,
}

impl Locator {
    #[must_use]
    pub fn new(cache: Arc<RawDatasetCache>, acquirer: Arc<LocationAcquirer>) -> Self {
        Self {
            cache,
            acquirer,
            default_radius_miles: DEFAULT_RADIUS_MILES,
        }
    }

    /// Overrides the radius used when [`search`](Self::search) is called
    /// without a request.
    #[must_use]
    pub fn with_default_radius(mut self, radius_miles: f64) -> Self {
        self.default_radius_miles = radius_miles;
        self
    }

    #[must_use]
    pub fn acquirer(&self) -> &LocationAcquirer {
        &self.acquirer
    }

    #[must_use]
    pub fn cache(&self) -> &RawDatasetCache {
        &self.cache
    }

    #[must_use]
    pub fn default_radius_miles(&self) -> f64 {
        self.default_radius_miles
    }

    /// Finds trucks near the request's reference point, nearest first.
    ///
    /// With `None`, the device location is acquired first and the default
    /// radius applies; if acquisition fails the result is empty.
    pub async fn search(&self, request: Option<SearchRequest>) -> Vec<FoodTruck> {
        match request {
            Some(request) => self.search_around(request).await,
            None => self.locate_and_search(self.default_radius_miles).await,
        }
    }

    /// Acquires the device location, then searches around it.
    pub async fn locate_and_search(&self, radius_miles: f64) -> Vec<FoodTruck> {
        match self.acquirer.acquire().await {
            Ok(reference) => {
                self.search_around(SearchRequest {
                    reference,
                    radius_miles,
                })
                .await
            }
            Err(_) => Vec::new(),
        }
    }

    /// Re-runs the search around the current reference point with a new
    /// radius.
    ///
    /// Returns `None` without doing anything when no reference point has
    /// been resolved yet; it does not prompt for a location.
    pub async fn change_radius(&self, radius_miles: f64) -> Option<Vec<FoodTruck>> {
        let reference = self.acquirer.reference_point().await?;
        Some(
            self.search_around(SearchRequest {
                reference,
                radius_miles,
            })
            .await,
        )
    }

    async fn search_around(&self, request: SearchRequest) -> Vec<FoodTruck> {
        let raws = match self.cache.get().await {
            Ok(raws) => raws,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "food truck dataset unavailable; returning no results"
                );
                return Vec::new();
            }
        };

        let trucks = parse_raw_food_trucks(&raws);
        let nearby = within_radius(trucks, &request.reference, request.radius_miles);
        let ranked = sort_by_distance(nearby, &request.reference);

        tracing::debug!(
            reference = %request.reference,
            radius_miles = request.radius_miles,
            results = ranked.len(),
            "nearby search complete"
        );
        ranked
    }
}
