//! CSV ingestion for station and trip tables.
//!
//! This module loads the two caller-supplied tables through `DataFusion`'s CSV
//! reader, adding path context to read failures. Schema validation happens
//! later, in the checkout transform itself, so that in-memory callers get the
//! same errors as CSV-backed ones.

use std::path::Path;

use datafusion::prelude::{CsvReadOptions, DataFrame, SessionContext};
use log::info;

use crate::error::{IoError, IoErrorExt, Result};

/// Reads the station reference table from a CSV file.
///
/// The file is expected to carry a header row naming at least the `id`, `lng`
/// and `lat` columns; any additional columns are carried through to the result
/// of the checkout transform.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist, or
/// [`IoError::Read`] if the CSV cannot be read or parsed.
pub async fn read_stations_csv(ctx: &SessionContext, path: &str) -> Result<DataFrame> {
    read_csv(ctx, path, "stations").await
}

/// Reads the trip table from a CSV file.
///
/// The file is expected to carry a header row naming at least the
/// `strt_statn` column. Empty values in that column are read as nulls and are
/// excluded from counting by the checkout transform.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist, or
/// [`IoError::Read`] if the CSV cannot be read or parsed.
pub async fn read_trips_csv(ctx: &SessionContext, path: &str) -> Result<DataFrame> {
    read_csv(ctx, path, "trips").await
}

async fn read_csv(ctx: &SessionContext, path: &str, table: &str) -> Result<DataFrame> {
    if !Path::new(path).exists() {
        return Err(IoError::FileNotFound { path: path.into() }.into());
    }

    info!("Reading {table} CSV file: {path}");
    ctx.read_csv(path, CsvReadOptions::new())
        .await
        .with_read_context("CSV", path)
}
