mod dataset;
mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "truckfinder-cli")]
#[command(about = "Find San Francisco food trucks near a location")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List food trucks near an explicit coordinate, nearest first
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,
        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,
        /// Search radius in miles (defaults to TRUCKFINDER_DEFAULT_RADIUS_MILES)
        #[arg(long)]
        radius_miles: Option<f64>,
        /// Only show trucks whose food items mention this text
        #[arg(long)]
        food_item: Option<String>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// List food trucks near the device location (TRUCKFINDER_DEVICE_LOCATION)
    Locate {
        /// Search radius in miles (defaults to TRUCKFINDER_DEFAULT_RADIUS_MILES)
        #[arg(long)]
        radius_miles: Option<f64>,
        /// Only show trucks whose food items mention this text
        #[arg(long)]
        food_item: Option<String>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch the raw dataset and report how many records are usable
    Dataset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = truckfinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Nearby {
            latitude,
            longitude,
            radius_miles,
            food_item,
            json,
        }) => {
            search::run_nearby(
                &config,
                latitude,
                longitude,
                search::SearchOptions {
                    radius_miles,
                    food_item,
                    json,
                },
            )
            .await?;
        }
        Some(Commands::Locate {
            radius_miles,
            food_item,
            json,
        }) => {
            search::run_locate(
                &config,
                search::SearchOptions {
                    radius_miles,
                    food_item,
                    json,
                },
            )
            .await?;
        }
        Some(Commands::Dataset) => dataset::run_dataset(&config).await?,
        None => println!("truckfinder-cli: run with --help to see available commands"),
    }

    Ok(())
}
