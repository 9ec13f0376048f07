pub mod app_config;
pub mod config;
pub mod geo;
pub mod trucks;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{haversine_meters, miles_to_meters, Coordinate, EARTH_RADIUS_M, METERS_PER_MILE};
pub use trucks::{FoodTruck, RawFoodTruck};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("latitude {0} is not a finite value in [-90, 90]")]
    InvalidLatitude(f64),
    #[error("longitude {0} is not a finite value in [-180, 180]")]
    InvalidLongitude(f64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
