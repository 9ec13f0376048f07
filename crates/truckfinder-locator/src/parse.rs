//! Validation of raw dataset rows into [`FoodTruck`]s.
//!
//! Upstream rows routinely carry empty, placeholder, or garbage coordinates.
//! Such rows are dropped, never reported as errors.

use serde_json::Value;
use truckfinder_core::{Coordinate, FoodTruck, RawFoodTruck};

/// Converts one raw row into a [`FoodTruck`].
///
/// Returns `None` when either coordinate is missing, does not parse as a
/// number, is NaN/infinite, or falls outside the valid geographic range.
/// Text fields are passed through; a row without `address` falls back to
/// its `locationdescription`.
#[must_use]
pub fn parse_raw_food_truck(raw: &RawFoodTruck) -> Option<FoodTruck> {
    let latitude = raw.latitude().and_then(parse_degrees)?;
    let longitude = raw.longitude().and_then(parse_degrees)?;
    let coordinate = Coordinate::new(latitude, longitude).ok()?;

    let location_description = raw.location_description();
    let address = raw
        .address()
        .or_else(|| location_description.clone())
        .unwrap_or_default();

    Some(FoodTruck {
        name: raw.applicant().unwrap_or_default(),
        address,
        location_description,
        food_items: raw.food_items(),
        coordinate,
    })
}

/// Parses every row, silently discarding the ones that fail validation.
#[must_use]
pub fn parse_raw_food_trucks(raws: &[RawFoodTruck]) -> Vec<FoodTruck> {
    let trucks: Vec<FoodTruck> = raws.iter().filter_map(parse_raw_food_truck).collect();
    let dropped = raws.len() - trucks.len();
    if dropped > 0 {
        tracing::debug!(
            dropped,
            total = raws.len(),
            "dropped food truck rows with unusable coordinates"
        );
    }
    trucks
}

/// Reads a degree value from a JSON string or number.
fn parse_degrees(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
