//! `stationstats-core` is the core library for the `stationstats` project,
//! providing checkout analytics for bike-share station data.
//!
//! This crate includes:
//! - **Geodesy**: The haversine great-circle distance and its `DataFusion` scalar UDF form.
//! - **Operations**: The checkout count / station join / distance-to-center transform.
//! - **I/O Helpers**: CSV ingestion for station and trip tables via `DataFusion`.
//!
//! The `operations` module exposes the main entry point, [`operations::station_checkouts`],
//! consumed by the CLI and other parts of the system.

pub mod error;
pub mod geo;
pub mod io;
pub mod operations;
pub mod types;
