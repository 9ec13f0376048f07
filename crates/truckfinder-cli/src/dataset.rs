//! `dataset` command handler.

use truckfinder_core::AppConfig;
use truckfinder_locator::{parse_raw_food_trucks, LocationAcquirer};

use crate::search::build_locator;

/// Fetch the upstream dataset once and print total versus usable records.
///
/// # Errors
///
/// Returns an error if the dataset cannot be fetched.
pub(crate) async fn run_dataset(config: &AppConfig) -> anyhow::Result<()> {
    let locator = build_locator(config, LocationAcquirer::unavailable())?;
    let records = locator
        .cache()
        .get()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, url = %config.dataset_url, "dataset fetch failed");
            anyhow::anyhow!("failed to fetch food truck dataset: {e}")
        })?;
    let valid = parse_raw_food_trucks(&records).len();
    tracing::info!(
        records = records.len(),
        valid,
        "fetched food truck dataset"
    );

    println!("dataset: {}", config.dataset_url);
    println!("records: {}", records.len());
    println!("valid:   {valid}");
    println!("dropped: {}", records.len() - valid);
    Ok(())
}
