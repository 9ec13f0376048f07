//! Narrowing a set of trucks by distance or by what they sell.

use truckfinder_core::{haversine_meters, miles_to_meters, Coordinate, FoodTruck};

/// Keeps the trucks whose great-circle distance to `reference` is at most
/// `radius_miles`.
///
/// The boundary is inclusive. A negative or NaN radius is treated as zero,
/// which keeps only trucks standing exactly on `reference`. Input order is
/// preserved.
#[must_use]
pub fn within_radius(
    trucks: Vec<FoodTruck>,
    reference: &Coordinate,
    radius_miles: f64,
) -> Vec<FoodTruck> {
    let max_distance_m = miles_to_meters(radius_miles);
    trucks
        .into_iter()
        .filter(|truck| haversine_meters(reference, &truck.coordinate) <= max_distance_m)
        .collect()
}

/// Keeps the trucks whose food-items text contains `term`, ignoring case.
///
/// A blank term matches everything. Trucks with no food-items text never
/// match a non-blank term. Input order is preserved, so this can run after
/// ranking.
#[must_use]
pub fn filter_by_food_item(trucks: Vec<FoodTruck>, term: &str) -> Vec<FoodTruck> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return trucks;
    }
    trucks
        .into_iter()
        .filter(|truck| {
            truck
                .food_items
                .as_deref()
                .is_some_and(|items| items.to_lowercase().contains(&needle))
        })
        .collect()
}
