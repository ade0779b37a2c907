//! Data types and column names for station checkout analytics.
//!
//! This module defines the options accepted by the checkout transform and the
//! column names shared between the station and trip tables and the result.

use crate::geo::{DOWNTOWN_BOSTON, GeoPoint};

/// Station identifier column, present in the station table and the result.
pub const COL_STATION_ID: &str = "id";
/// Station longitude column, decimal degrees.
pub const COL_LNG: &str = "lng";
/// Station latitude column, decimal degrees.
pub const COL_LAT: &str = "lat";
/// Originating-station identifier column in the trip table.
pub const COL_START_STATION: &str = "strt_statn";
/// Checkout count column in the result.
pub const COL_CHECKOUTS: &str = "checkouts";
/// Distance-to-center column in the result, in miles.
pub const COL_DIST_TO_CENTER: &str = "dist_to_center";

/// Options for the checkout transform.
///
/// The only knob is the reference point used for the distance-to-center
/// column; it defaults to downtown Boston.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckoutOptions {
    /// Reference point for the `dist_to_center` column.
    pub center: GeoPoint,
}

impl Default for CheckoutOptions {
    fn default() -> Self {
        Self {
            center: DOWNTOWN_BOSTON,
        }
    }
}

impl CheckoutOptions {
    /// Creates options with a custom reference point.
    #[must_use]
    pub fn with_center(center: GeoPoint) -> Self {
        Self { center }
    }
}
