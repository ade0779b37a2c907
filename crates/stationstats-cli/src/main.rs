//! Command-line interface for `stationstats`, a bike-share station analytics tool.
//!
//! This binary provides a user-friendly CLI over the [`stationstats_core`] library:
//! it loads a station table and a trip table from CSV, counts trip checkouts per
//! originating station, joins the station attributes, and appends each station's
//! great-circle distance from a reference point (default: downtown Boston).
//!
//! # Architecture
//!
//! The CLI is built using [`clap`] for argument parsing and [`tracing`] for
//! structured logging. It acts as a thin façade that parses arguments, configures
//! logging, and delegates to the core transform. Results are printed as a table
//! or written to a CSV file.

use anyhow::Result;
use clap::Parser;
use datafusion::dataframe::DataFrameWriteOptions;
use datafusion::prelude::SessionContext;
use tracing::{Level, info};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

use stationstats_core::geo::GeoPoint;
use stationstats_core::types::CheckoutOptions;
use stationstats_core::{io, operations};

mod display;

#[derive(Parser)]
#[command(
    name = "stationstats",
    version,
    about = "Bike-share station checkout analytics",
    long_about = "stationstats counts trip checkouts per bike-share station, joins station\n\
                  metadata, and computes each station's great-circle distance from a\n\
                  reference point (default: downtown Boston)."
)]
/// Command-line arguments and options for the `stationstats` CLI.
struct Cli {
    /// Path to the station CSV (columns: id, lng, lat, plus extras).
    #[arg(short, long, value_name = "CSV")]
    stations: String,

    /// Path to the trip CSV (column: strt_statn, plus extras).
    #[arg(short, long, value_name = "CSV")]
    trips: String,

    /// Longitude of the reference point, overriding downtown Boston.
    #[arg(long, value_name = "DEG", requires = "center_lat")]
    center_lng: Option<f64>,

    /// Latitude of the reference point, overriding downtown Boston.
    #[arg(long, value_name = "DEG", requires = "center_lng")]
    center_lat: Option<f64>,

    /// Write the full result (all station attributes) to this CSV instead of
    /// printing a table.
    #[arg(short, long, value_name = "CSV")]
    output: Option<String>,

    /// Enable verbose (INFO level) logging output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug (DEBUG level) logging output with detailed diagnostics.
    #[arg(short, long, global = true)]
    debug: bool,
}

/// Entry point for the `stationstats` command-line interface.
///
/// Parses command-line arguments, configures the logging system based on
/// verbosity flags, and runs the checkout transform.
///
/// # Errors
///
/// Returns an error if the logging system cannot be initialized. Transform
/// failures are reported with a user-facing message and exit code 1.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity flags
    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    // Bridge logs from the `log` crate to the `tracing` ecosystem.
    LogTracer::init()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true) // Show module paths for better context
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if let Err(err) = run(&cli).await {
        eprintln!("{}", err.user_message());
        if let Some(suggestion) = err.recovery_suggestion() {
            eprintln!("\n{suggestion}");
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: &Cli) -> stationstats_core::error::Result<()> {
    let ctx = SessionContext::new();

    let stations = io::read_stations_csv(&ctx, &cli.stations).await?;
    let trips = io::read_trips_csv(&ctx, &cli.trips).await?;

    let options = match (cli.center_lng, cli.center_lat) {
        (Some(lng), Some(lat)) => CheckoutOptions::with_center(GeoPoint::new(lng, lat)),
        _ => CheckoutOptions::default(),
    };

    let result = operations::station_checkouts(stations, trips, &options)?;

    match &cli.output {
        Some(output) => {
            info!("Writing result CSV file: {output}");
            result
                .write_csv(output, DataFrameWriteOptions::new(), None)
                .await?;
            info!("Result written.");
        },
        None => {
            let batches = result.collect().await?;
            display::display_checkouts(&batches)?;
        },
    }

    Ok(())
}
