//! Checkout counting and station join for bike-share analytics.
//!
//! This module provides the main transform of the crate: count trip checkouts
//! per originating station, attach the station's descriptive attributes, and
//! append the great-circle distance from each station to a reference point.

use datafusion::common::JoinType;
use datafusion::functions_aggregate::expr_fn::count;
use datafusion::prelude::{DataFrame, col, lit};
use log::info;

use crate::error::{Result, SchemaError};
use crate::geo::haversine_udf;
use crate::types::{
    CheckoutOptions, COL_CHECKOUTS, COL_DIST_TO_CENTER, COL_LAT, COL_LNG, COL_START_STATION,
    COL_STATION_ID,
};

/// Counts checkouts per station and computes each station's distance to the
/// reference point in `options`.
///
/// The returned frame has one row per distinct `strt_statn` value observed in
/// `trips`, sorted by station id, with columns: `id`, `checkouts`, all columns
/// of `stations` except its `id`, and `dist_to_center` in miles.
///
/// Semantics:
/// - Trip rows with a null `strt_statn` are filtered out before counting, so
///   they contribute to no station's count.
/// - The join is a left join from the counts onto `stations`: a trip-side id
///   with no matching station keeps its row, with null station attributes and
///   a null `dist_to_center`. Stations with no trips contribute no row.
///
/// The transform is lazy; no data moves until the caller collects the frame.
///
/// # Errors
///
/// Returns [`SchemaError::MissingColumn`] if `trips` lacks `strt_statn` or
/// `stations` lacks `id`, `lng` or `lat`. Later plan or execution failures
/// surface as [`crate::error::StationStatsError::Query`].
pub fn station_checkouts(
    stations: DataFrame,
    trips: DataFrame,
    options: &CheckoutOptions,
) -> Result<DataFrame> {
    require_columns(&trips, "trips", &[COL_START_STATION])?;
    require_columns(&stations, "stations", &[COL_STATION_ID, COL_LNG, COL_LAT])?;

    info!(
        "Counting checkouts per station, center = ({}, {})",
        options.center.lng, options.center.lat
    );

    // Rows with an undefined origin station are excluded from counting.
    let counts = trips
        .filter(col(COL_START_STATION).is_not_null())?
        .aggregate(
            vec![col(COL_START_STATION)],
            vec![count(lit(1)).alias(COL_CHECKOUTS)],
        )?;

    let joined = counts.join(
        stations,
        JoinType::Left,
        &[COL_START_STATION],
        &[COL_STATION_ID],
        None,
    )?;

    let distance = haversine_udf(options.center);
    let result = joined
        .drop_columns(&[COL_STATION_ID])?
        .with_column_renamed(COL_START_STATION, COL_STATION_ID)?
        .with_column(
            COL_DIST_TO_CENTER,
            distance.call(vec![col(COL_LNG), col(COL_LAT)]),
        )?
        .sort(vec![col(COL_STATION_ID).sort(true, false)])?;

    Ok(result)
}

/// Checks that `df` exposes every column in `required`, by unqualified name.
fn require_columns(df: &DataFrame, table: &str, required: &[&str]) -> Result<()> {
    let schema = df.schema();
    for column in required {
        if schema.field_with_unqualified_name(column).is_err() {
            let available = schema
                .fields()
                .iter()
                .map(|f| f.name().clone())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(SchemaError::MissingColumn {
                table: table.to_string(),
                column: (*column).to_string(),
                available,
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StationStatsError;
    use crate::geo::{haversine_miles, DOWNTOWN_BOSTON, GeoPoint};
    use arrow_array::{Array, Float64Array, Int64Array, RecordBatch, StringArray};
    use arrow_schema::{DataType, Field, Schema};
    use datafusion::arrow::compute::concat_batches;
    use datafusion::prelude::SessionContext;
    use std::sync::Arc;

    fn stations_frame(ctx: &SessionContext) -> DataFrame {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("station", DataType::Utf8, true),
            Field::new("lat", DataType::Float64, true),
            Field::new("lng", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(StringArray::from(vec!["Fan Pier", "Union Square"])),
                Arc::new(Float64Array::from(vec![42.36, 42.34])),
                Arc::new(Float64Array::from(vec![-71.06, -71.10])),
            ],
        )
        .unwrap();
        ctx.read_batch(batch).unwrap()
    }

    fn trips_frame(ctx: &SessionContext, origins: Vec<Option<i64>>) -> DataFrame {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "strt_statn",
            DataType::Int64,
            true,
        )]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(origins))]).unwrap();
        ctx.read_batch(batch).unwrap()
    }

    async fn collect_single(df: DataFrame) -> RecordBatch {
        let schema = Arc::new(df.schema().as_arrow().clone());
        let batches = df.collect().await.unwrap();
        concat_batches(&schema, &batches).unwrap()
    }

    fn int64_column<'a>(batch: &'a RecordBatch, name: &str) -> &'a Int64Array {
        batch
            .column_by_name(name)
            .unwrap()
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap()
    }

    fn float64_column<'a>(batch: &'a RecordBatch, name: &str) -> &'a Float64Array {
        batch
            .column_by_name(name)
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap()
    }

    #[tokio::test]
    async fn test_counts_joins_and_distances() {
        let ctx = SessionContext::new();
        let stations = stations_frame(&ctx);
        let trips = trips_frame(&ctx, vec![Some(1), Some(1), Some(2), None]);

        let result = station_checkouts(stations, trips, &CheckoutOptions::default()).unwrap();
        let batch = collect_single(result).await;

        assert_eq!(batch.num_rows(), 2);
        let ids = int64_column(&batch, "id");
        let checkouts = int64_column(&batch, "checkouts");
        assert_eq!(ids.value(0), 1);
        assert_eq!(checkouts.value(0), 2);
        assert_eq!(ids.value(1), 2);
        assert_eq!(checkouts.value(1), 1);

        // Station attributes carried through the join.
        let names = batch
            .column_by_name("station")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(names.value(0), "Fan Pier");
        assert_eq!(names.value(1), "Union Square");

        let distances = float64_column(&batch, "dist_to_center");
        let expected = haversine_miles(GeoPoint::new(-71.06, 42.36), DOWNTOWN_BOSTON);
        assert!((distances.value(0) - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_checkout_sum_matches_defined_trips() {
        let ctx = SessionContext::new();
        let stations = stations_frame(&ctx);
        let origins = vec![
            Some(1),
            Some(2),
            None,
            Some(2),
            Some(2),
            None,
            Some(1),
            Some(9),
        ];
        let defined = origins.iter().filter(|o| o.is_some()).count() as i64;
        let trips = trips_frame(&ctx, origins);

        let result = station_checkouts(stations, trips, &CheckoutOptions::default()).unwrap();
        let batch = collect_single(result).await;

        let checkouts = int64_column(&batch, "checkouts");
        let total: i64 = (0..checkouts.len()).map(|i| checkouts.value(i)).sum();
        assert_eq!(total, defined);
        for i in 0..checkouts.len() {
            assert!(checkouts.value(i) >= 1);
        }
    }

    #[tokio::test]
    async fn test_unmatched_station_keeps_row_with_null_attributes() {
        let ctx = SessionContext::new();
        let stations = stations_frame(&ctx);
        let trips = trips_frame(&ctx, vec![Some(7)]);

        let result = station_checkouts(stations, trips, &CheckoutOptions::default()).unwrap();
        let batch = collect_single(result).await;

        assert_eq!(batch.num_rows(), 1);
        let ids = int64_column(&batch, "id");
        assert_eq!(ids.value(0), 7);
        let lats = float64_column(&batch, "lat");
        assert!(lats.is_null(0));
        let distances = float64_column(&batch, "dist_to_center");
        assert!(distances.is_null(0));
    }

    #[tokio::test]
    async fn test_result_sorted_by_station_id() {
        let ctx = SessionContext::new();
        let stations = stations_frame(&ctx);
        let trips = trips_frame(&ctx, vec![Some(2), Some(1), Some(2), Some(1), Some(1)]);

        let result = station_checkouts(stations, trips, &CheckoutOptions::default()).unwrap();
        let batch = collect_single(result).await;

        let ids = int64_column(&batch, "id");
        assert_eq!(ids.value(0), 1);
        assert_eq!(ids.value(1), 2);
    }

    #[tokio::test]
    async fn test_empty_trips_yields_empty_result() {
        let ctx = SessionContext::new();
        let stations = stations_frame(&ctx);
        let trips = trips_frame(&ctx, vec![None, None]);

        let result = station_checkouts(stations, trips, &CheckoutOptions::default()).unwrap();
        let batch = collect_single(result).await;
        assert_eq!(batch.num_rows(), 0);
    }

    #[tokio::test]
    async fn test_custom_center_zeroes_distance_at_center() {
        let ctx = SessionContext::new();
        let stations = stations_frame(&ctx);
        let trips = trips_frame(&ctx, vec![Some(1)]);

        let options = CheckoutOptions::with_center(GeoPoint::new(-71.06, 42.36));
        let result = station_checkouts(stations, trips, &options).unwrap();
        let batch = collect_single(result).await;

        let distances = float64_column(&batch, "dist_to_center");
        assert!(distances.value(0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_trip_column_is_schema_error() {
        let ctx = SessionContext::new();
        let stations = stations_frame(&ctx);
        let schema = Arc::new(Schema::new(vec![Field::new(
            "duration",
            DataType::Int64,
            true,
        )]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(Int64Array::from(vec![60]))],
        )
        .unwrap();
        let trips = ctx.read_batch(batch).unwrap();

        let err = station_checkouts(stations, trips, &CheckoutOptions::default()).unwrap_err();
        assert!(matches!(
            &err,
            StationStatsError::Schema(SchemaError::MissingColumn { .. })
        ));
        let message = err.to_string();
        assert!(message.contains("strt_statn"));
        assert!(message.contains("trips"));
    }

    #[tokio::test]
    async fn test_missing_station_column_is_schema_error() {
        let ctx = SessionContext::new();
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("lat", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1])),
                Arc::new(Float64Array::from(vec![42.36])),
            ],
        )
        .unwrap();
        let stations = ctx.read_batch(batch).unwrap();
        let trips = trips_frame(&ctx, vec![Some(1)]);

        let result = station_checkouts(stations, trips, &CheckoutOptions::default());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("lng"));
        assert!(err.to_string().contains("stations"));
    }
}
