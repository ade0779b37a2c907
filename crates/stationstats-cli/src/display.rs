//! Display utilities for formatting CLI output.
//!
//! This module converts the result of the checkout transform into table rows
//! and presents them in a human-readable format. Only the core columns are
//! shown on the terminal; the full attribute set is available through the
//! `--output` CSV.

use anyhow::{Context, Result};
use arrow_array::{Array, RecordBatch};
use datafusion::arrow::util::display::array_value_to_string;
use tabled::{Table, Tabled};

use stationstats_core::types::{
    COL_CHECKOUTS, COL_DIST_TO_CENTER, COL_LAT, COL_LNG, COL_STATION_ID,
};

/// Table row representation for displaying one station's checkout summary.
#[derive(Tabled)]
pub struct StationRow {
    /// Station identifier.
    #[tabled(rename = "Station")]
    pub id: String,
    /// Number of trip checkouts originating at the station.
    #[tabled(rename = "Checkouts")]
    pub checkouts: String,
    /// Station latitude in decimal degrees.
    #[tabled(rename = "Lat")]
    pub lat: String,
    /// Station longitude in decimal degrees.
    #[tabled(rename = "Lng")]
    pub lng: String,
    /// Great-circle distance to the reference point, in miles.
    #[tabled(rename = "Miles to Center")]
    pub dist_to_center: String,
}

/// Converts collected result batches into display rows.
///
/// Null cells (station ids that matched no station record) render as `N/A`.
///
/// # Errors
///
/// Returns an error if a batch lacks one of the result columns or a cell
/// cannot be formatted.
pub fn rows_from_batches(batches: &[RecordBatch]) -> Result<Vec<StationRow>> {
    let mut rows = Vec::new();
    for batch in batches {
        for row in 0..batch.num_rows() {
            rows.push(StationRow {
                id: cell(batch, COL_STATION_ID, row)?,
                checkouts: cell(batch, COL_CHECKOUTS, row)?,
                lat: cell(batch, COL_LAT, row)?,
                lng: cell(batch, COL_LNG, row)?,
                dist_to_center: cell(batch, COL_DIST_TO_CENTER, row)?,
            });
        }
    }
    Ok(rows)
}

/// Display the checkout summary in a formatted table on standard output.
///
/// # Errors
///
/// Returns an error if the batches cannot be converted to rows.
pub fn display_checkouts(batches: &[RecordBatch]) -> Result<()> {
    let rows = rows_from_batches(batches)?;

    println!("\nStations with checkouts ({} total):\n", rows.len());

    let table = Table::new(rows).to_string();
    println!("{table}");

    Ok(())
}

fn cell(batch: &RecordBatch, name: &str, row: usize) -> Result<String> {
    let array = batch
        .column_by_name(name)
        .with_context(|| format!("result batch is missing column '{name}'"))?;
    if array.is_null(row) {
        return Ok("N/A".to_string());
    }
    array_value_to_string(array, row).with_context(|| format!("formatting column '{name}'"))
}
