//! Command line price prediction over a CSV price file

use anyhow::{Context, Result};
use clap::Parser;
use price_forecast::request::predict_with;
use price_forecast::{ForecastConfig, PredictRequest, PriceTable};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Forecast crop prices from historical market records")]
struct Cli {
    /// Price file with a `date,crop,location,price` header
    #[arg(short, long, env = "CROP_PRICE_DATA")]
    data: PathBuf,

    /// Crop name (case-insensitive)
    #[arg(long)]
    crop: Option<String>,

    /// Market location name (case-insensitive)
    #[arg(long)]
    location: Option<String>,

    /// Target date, e.g. "2025-08-15" or "15/08/2025"
    #[arg(long)]
    date: Option<String>,

    /// Print the crops and locations in the price file and exit
    #[arg(long)]
    list: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let table = PriceTable::from_csv(&cli.data)
        .with_context(|| format!("Failed to load price table from {}", cli.data.display()))?;

    if cli.list {
        let listing = serde_json::json!({
            "crops": table.crops(),
            "locations": table.locations(),
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    let config = ForecastConfig::from_env().context("Invalid forecaster configuration")?;
    let request = PredictRequest {
        crop: cli.crop,
        location: cli.location,
        date: cli.date,
    };

    let response = predict_with(&table, &request, config)?;
    let output = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", output);

    Ok(())
}
