//! Geographic primitives: validated coordinates and great-circle distance.
//!
//! Distances use the haversine formula on a sphere with the mean Earth
//! radius. At city scale the spherical error is well under a metre per
//! kilometre, so no ellipsoidal correction is applied.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// International mile in metres.
pub const METERS_PER_MILE: f64 = 1_609.344;

/// A WGS-84 latitude/longitude pair in decimal degrees.
///
/// Values built through [`Coordinate::new`] are always finite and inside the
/// valid geographic ranges. Deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoordinateParts")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Deserialize)]
struct CoordinateParts {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<CoordinateParts> for Coordinate {
    type Error = CoreError;

    fn try_from(parts: CoordinateParts) -> Result<Self, Self::Error> {
        Coordinate::new(parts.latitude, parts.longitude)
    }
}

impl Coordinate {
    /// Builds a coordinate after range-checking both components.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidLatitude`] or [`CoreError::InvalidLongitude`]
    /// when a component is NaN, infinite, or outside `[-90, 90]` / `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Great-circle distance to `other` in metres.
    #[must_use]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_meters(self, other)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

impl std::str::FromStr for Coordinate {
    type Err = String;

    /// Parses `"lat,lng"` (whitespace around either part is ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected \"lat,lng\", got \"{s}\""))?;
        let latitude = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("latitude \"{}\": {e}", lat.trim()))?;
        let longitude = lng
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("longitude \"{}\": {e}", lng.trim()))?;
        Coordinate::new(latitude, longitude).map_err(|e| e.to_string())
    }
}

/// Haversine distance between two coordinates, in metres.
#[must_use]
pub fn haversine_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Converts a radius in miles to metres, clamping negative and NaN input to zero.
#[must_use]
pub fn miles_to_meters(miles: f64) -> f64 {
    if miles.is_nan() {
        return 0.0;
    }
    miles.max(0.0) * METERS_PER_MILE
}
