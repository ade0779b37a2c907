//! Great-circle geodesy for station analytics.
//!
//! This module provides the haversine distance between two geographic points
//! in decimal degrees, both as a plain function and as a `DataFusion` scalar
//! UDF for row-wise application over `(lng, lat)` columns.

use std::sync::Arc;

use arrow_array::builder::Float64Builder;
use arrow_array::{Array, ArrayRef, Float64Array};
use arrow_schema::DataType;
use datafusion::error::DataFusionError;
use datafusion::logical_expr::{ColumnarValue, ScalarUDF, Volatility};
use datafusion::prelude::create_udf;

/// Earth radius in miles, as used by the haversine formula.
pub const EARTH_RADIUS_MILES: f64 = 3956.0;

/// Default reference point for distance-to-center computations: downtown Boston.
pub const DOWNTOWN_BOSTON: GeoPoint = GeoPoint::new(-71.060175, 42.355589);

/// A geographic point in decimal degrees, longitude first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Longitude in decimal degrees.
    pub lng: f64,
    /// Latitude in decimal degrees.
    pub lat: f64,
}

impl GeoPoint {
    /// Creates a point from longitude and latitude in decimal degrees.
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// Calculates the great-circle distance in miles between `point` and `center`
/// using the haversine formula.
///
/// Coordinates are decimal degrees. Identical points yield `0.0`; antipodal
/// points yield roughly `PI * EARTH_RADIUS_MILES`. Coordinate ranges are not
/// validated: out-of-range inputs produce mathematically defined but
/// semantically meaningless results, and NaN inputs propagate to a NaN result.
///
/// # Examples
///
/// ```
/// use stationstats_core::geo::{haversine_miles, DOWNTOWN_BOSTON};
///
/// let at_center = haversine_miles(DOWNTOWN_BOSTON, DOWNTOWN_BOSTON);
/// assert_eq!(at_center, 0.0);
/// ```
#[must_use]
pub fn haversine_miles(point: GeoPoint, center: GeoPoint) -> f64 {
    let (lng1, lat1) = (point.lng.to_radians(), point.lat.to_radians());
    let (lng2, lat2) = (center.lng.to_radians(), center.lat.to_radians());

    let dlng = lng2 - lng1;
    let dlat = lat2 - lat1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * a.sqrt().asin() * EARTH_RADIUS_MILES
}

/// Builds a `DataFusion` scalar UDF computing [`haversine_miles`] against a
/// fixed `center`, taking `(lng, lat)` as `Float64` arguments.
///
/// A null in either input produces a null output row. This is how rows whose
/// station attributes were not matched by the join surface in the result: the
/// distance column is null rather than an error.
#[must_use]
pub fn haversine_udf(center: GeoPoint) -> ScalarUDF {
    let fun = Arc::new(move |args: &[ColumnarValue]| -> Result<ColumnarValue, DataFusionError> {
        let arrays = ColumnarValue::values_to_arrays(args)?;
        let lng = as_float64(&arrays[0], "lng")?;
        let lat = as_float64(&arrays[1], "lat")?;
        let distances = haversine_column(lng, lat, center);
        Ok(ColumnarValue::Array(Arc::new(distances) as ArrayRef))
    });

    create_udf(
        "haversine_miles",
        vec![DataType::Float64, DataType::Float64],
        DataType::Float64,
        Volatility::Immutable,
        fun,
    )
}

/// Applies [`haversine_miles`] row-wise over parallel `lng`/`lat` arrays.
///
/// A null in either input yields a null output row.
fn haversine_column(lng: &Float64Array, lat: &Float64Array, center: GeoPoint) -> Float64Array {
    let mut builder = Float64Builder::with_capacity(lng.len());
    for row in 0..lng.len() {
        if lng.is_null(row) || lat.is_null(row) {
            builder.append_null();
        } else {
            let point = GeoPoint::new(lng.value(row), lat.value(row));
            builder.append_value(haversine_miles(point, center));
        }
    }
    builder.finish()
}

fn as_float64<'a>(array: &'a ArrayRef, name: &str) -> Result<&'a Float64Array, DataFusionError> {
    array
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| {
            DataFusionError::Internal(format!(
                "haversine_miles expected Float64 array for '{name}', got {}",
                array.data_type()
            ))
        })
}
