use crate::app_config::{AppConfig, Environment};
use crate::geo::Coordinate;
use crate::ConfigError;

pub const DEFAULT_DATASET_URL: &str = "https://data.sfgov.org/resource/rqzj-sfat.json";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::str::FromStr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("TRUCKFINDER_ENV", "development"));

    let bind_addr = or_default("TRUCKFINDER_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("TRUCKFINDER_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("TRUCKFINDER_LOG_LEVEL", "info");

    let dataset_url = or_default("TRUCKFINDER_DATASET_URL", DEFAULT_DATASET_URL);
    if !dataset_url.starts_with("http://") && !dataset_url.starts_with("https://") {
        return Err(invalid(
            "TRUCKFINDER_DATASET_URL",
            format!("expected an http(s) URL, got \"{dataset_url}\""),
        ));
    }
    let dataset_timeout_secs = parse_u64("TRUCKFINDER_DATASET_TIMEOUT_SECS", "30")?;
    if dataset_timeout_secs == 0 {
        return Err(invalid(
            "TRUCKFINDER_DATASET_TIMEOUT_SECS",
            "timeout must be at least one second".to_string(),
        ));
    }
    let user_agent = or_default(
        "TRUCKFINDER_USER_AGENT",
        "truckfinder/0.1 (nearby-food-trucks)",
    );
    let cache_ttl_secs = parse_u64("TRUCKFINDER_CACHE_TTL_SECS", "3600")?;

    let default_radius_miles = or_default("TRUCKFINDER_DEFAULT_RADIUS_MILES", "1.0")
        .parse::<f64>()
        .map_err(|e| invalid("TRUCKFINDER_DEFAULT_RADIUS_MILES", e.to_string()))?;
    if !default_radius_miles.is_finite() || default_radius_miles < 0.0 {
        return Err(invalid(
            "TRUCKFINDER_DEFAULT_RADIUS_MILES",
            format!(
                "radius must be a finite, non-negative number of miles, got {default_radius_miles}"
            ),
        ));
    }

    let rate_limit_max_requests = parse_usize("TRUCKFINDER_RATE_LIMIT_MAX_REQUESTS", "120")?;
    let rate_limit_window_secs = parse_u64("TRUCKFINDER_RATE_LIMIT_WINDOW_SECS", "60")?;

    let device_location = lookup("TRUCKFINDER_DEVICE_LOCATION")
        .ok()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| Coordinate::from_str(&raw))
        .transpose()
        .map_err(|reason| invalid("TRUCKFINDER_DEVICE_LOCATION", reason))?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        dataset_url,
        dataset_timeout_secs,
        user_agent,
        cache_ttl_secs,
        default_radius_miles,
        rate_limit_max_requests,
        rate_limit_window_secs,
        device_location,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
