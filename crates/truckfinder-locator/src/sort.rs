//! Nearest-first ordering.

use truckfinder_core::{haversine_meters, Coordinate, FoodTruck};

/// Orders trucks by ascending great-circle distance to `reference`.
///
/// The sort is stable: trucks at equal distance keep their input order.
/// Each distance is computed once. Callers run this on an already
/// radius-filtered set.
#[must_use]
pub fn sort_by_distance(trucks: Vec<FoodTruck>, reference: &Coordinate) -> Vec<FoodTruck> {
    let mut keyed: Vec<(f64, FoodTruck)> = trucks
        .into_iter()
        .map(|truck| (haversine_meters(reference, &truck.coordinate), truck))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    keyed.into_iter().map(|(_, truck)| truck).collect()
}
