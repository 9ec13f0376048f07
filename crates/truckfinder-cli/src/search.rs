//! `nearby` and `locate` command handlers.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use truckfinder_core::{AppConfig, Coordinate, FoodTruck};
use truckfinder_locator::{
    filter_by_food_item, DatasetClient, FixedLocation, LocationAcquirer, LocationError, Locator,
    RawDatasetCache, SearchRequest,
};

/// Flags shared by the search commands.
#[derive(Debug, Clone, Default)]
pub(crate) struct SearchOptions {
    pub radius_miles: Option<f64>,
    pub food_item: Option<String>,
    pub json: bool,
}

pub(crate) fn build_locator(
    config: &AppConfig,
    acquirer: LocationAcquirer,
) -> anyhow::Result<Locator> {
    let client = DatasetClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build dataset client: {e}"))?;
    let cache = RawDatasetCache::new(
        Arc::new(client),
        Duration::from_secs(config.cache_ttl_secs),
    );
    Ok(Locator::new(Arc::new(cache), Arc::new(acquirer))
        .with_default_radius(config.default_radius_miles))
}

/// The acquirer for this machine: backed by `TRUCKFINDER_DEVICE_LOCATION`
/// when set, otherwise without any location capability.
pub(crate) fn device_acquirer(config: &AppConfig) -> LocationAcquirer {
    match config.device_location {
        Some(position) => LocationAcquirer::new(Arc::new(FixedLocation(position))),
        None => LocationAcquirer::unavailable(),
    }
}

/// Search around an explicit coordinate.
///
/// # Errors
///
/// Returns an error if the coordinate is invalid or the dataset client
/// cannot be built. An unreachable dataset prints no results instead.
pub(crate) async fn run_nearby(
    config: &AppConfig,
    latitude: f64,
    longitude: f64,
    options: SearchOptions,
) -> anyhow::Result<()> {
    let reference = Coordinate::new(latitude, longitude)?;
    let locator = build_locator(config, LocationAcquirer::unavailable())?;
    let radius_miles = options
        .radius_miles
        .unwrap_or_else(|| locator.default_radius_miles());

    let trucks = locator
        .search(Some(SearchRequest {
            reference,
            radius_miles,
        }))
        .await;
    tracing::info!(%reference, radius_miles, results = trucks.len(), "nearby search finished");
    print_results(trucks, &reference, radius_miles, &options)
}

/// Search around the device location.
///
/// # Errors
///
/// Returns the acquisition failure, with its reason, when the device
/// location cannot be determined.
pub(crate) async fn run_locate(config: &AppConfig, options: SearchOptions) -> anyhow::Result<()> {
    let locator = build_locator(config, device_acquirer(config))?;
    let radius_miles = options
        .radius_miles
        .unwrap_or_else(|| locator.default_radius_miles());

    let trucks = locator.locate_and_search(radius_miles).await;

    if let Some(reason) = locator.acquirer().state().await.failure() {
        tracing::error!(error = %reason, "could not determine the device location");
        anyhow::bail!(location_failure_message(reason));
    }
    let Some(reference) = locator.acquirer().reference_point().await else {
        anyhow::bail!(LocationError::USER_MESSAGE);
    };

    print_results(trucks, &reference, radius_miles, &options)
}

pub(crate) fn location_failure_message(reason: LocationError) -> String {
    let mut message = format!("{} ({reason})", LocationError::USER_MESSAGE);
    if reason == LocationError::CapabilityUnavailable {
        message.push_str("; set TRUCKFINDER_DEVICE_LOCATION=\"lat,lng\" to provide one");
    }
    message
}

fn print_results(
    trucks: Vec<FoodTruck>,
    reference: &Coordinate,
    radius_miles: f64,
    options: &SearchOptions,
) -> anyhow::Result<()> {
    let trucks = match options.food_item.as_deref() {
        Some(term) => filter_by_food_item(trucks, term),
        None => trucks,
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&trucks)?);
    } else {
        print!("{}", format_results(&trucks, reference, radius_miles));
    }
    Ok(())
}

/// Human-readable listing, one numbered line per truck.
pub(crate) fn format_results(
    trucks: &[FoodTruck],
    reference: &Coordinate,
    radius_miles: f64,
) -> String {
    if trucks.is_empty() {
        return format!("No food trucks found within {radius_miles} mi of {reference}\n");
    }

    let mut out = format!(
        "{} food trucks within {radius_miles} mi of {reference}\n",
        trucks.len()
    );
    for (index, truck) in trucks.iter().enumerate() {
        let distance = truck.coordinate.distance_to(reference);
        let _ = writeln!(
            out,
            "{:>3}. {} ({distance:.0} m) {}",
            index + 1,
            if truck.name.is_empty() {
                "(unnamed)"
            } else {
                truck.name.as_str()
            },
            truck.address
        );
        if let Some(items) = &truck.food_items {
            let _ = writeln!(out, "     {items}");
        }
    }
    out
}
