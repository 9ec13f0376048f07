//! Food truck records: the raw upstream shape and the validated domain type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geo::Coordinate;

/// One row of the SF mobile food facility permit dataset, exactly as
/// delivered by upstream.
///
/// Nothing about the row is trusted: any field may be missing, empty, or of
/// an unexpected JSON type. The full object is kept so it can be passed
/// through to API consumers unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFoodTruck(Map<String, Value>);

impl RawFoodTruck {
    /// Wraps a JSON value, returning `None` unless it is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Raw access to any field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns a field rendered as text when it is a JSON string or number.
    ///
    /// Blank strings are reported as absent.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<String> {
        match self.0.get(name)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    #[must_use]
    pub fn applicant(&self) -> Option<String> {
        self.text("applicant")
    }

    #[must_use]
    pub fn address(&self) -> Option<String> {
        self.text("address")
    }

    #[must_use]
    pub fn location_description(&self) -> Option<String> {
        self.text("locationdescription")
    }

    #[must_use]
    pub fn food_items(&self) -> Option<String> {
        self.text("fooditems")
    }

    #[must_use]
    pub fn latitude(&self) -> Option<&Value> {
        self.field("latitude")
    }

    #[must_use]
    pub fn longitude(&self) -> Option<&Value> {
        self.field("longitude")
    }
}

impl From<Map<String, Value>> for RawFoodTruck {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A food truck whose coordinate has been validated.
///
/// Only the record parser in `truckfinder-locator` builds these from raw rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodTruck {
    /// Permit applicant, which is the name the truck trades under.
    pub name: String,
    pub address: String,
    pub location_description: Option<String>,
    /// Free-text list of what the truck sells.
    pub food_items: Option<String>,
    pub coordinate: Coordinate,
}
