//! Fuel monthly aggregation.
//!
//! Median over pump prices (station price distributions carry heavy
//! outliers) and summed volume (total throughput, not a price point).

use super::median;
use crate::calendar::month_end_of;
use crate::domain::product::FuelProduct;
use crate::domain::rows::{FuelMonthlyDetailRow, FuelMonthlyRow};
use crate::error::TransformError;
use crate::frame::{self, fuel_monthly_detail_to_frame, fuel_monthly_to_frame};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeMap;

/// Monthly (period, product) aggregate: median pump price, total volume.
pub fn aggregate_fuel_monthly(clean: &DataFrame) -> Result<DataFrame, TransformError> {
    let rows = frame::fuel_rows(clean)?;

    let mut buckets: BTreeMap<(NaiveDate, FuelProduct), (Vec<f64>, f64)> = BTreeMap::new();
    for row in rows {
        let entry = buckets
            .entry((month_end_of(row.period), row.product))
            .or_default();
        entry.0.push(row.pump_price);
        entry.1 += row.volume;
    }

    let rows: Vec<FuelMonthlyRow> = buckets
        .into_iter()
        .map(|((period, product), (mut prices, total_volume))| FuelMonthlyRow {
            period,
            product,
            median_price: median(&mut prices),
            total_volume,
        })
        .collect();

    fuel_monthly_to_frame(&rows)
}

/// Finer-grained variant keeping the (province, flag) dimensions.
pub fn aggregate_fuel_monthly_detail(clean: &DataFrame) -> Result<DataFrame, TransformError> {
    let rows = frame::fuel_rows(clean)?;

    let mut buckets: BTreeMap<(NaiveDate, String, String, FuelProduct), (Vec<f64>, f64)> =
        BTreeMap::new();
    for row in rows {
        let key = (
            month_end_of(row.period),
            row.province,
            row.flag,
            row.product,
        );
        let entry = buckets.entry(key).or_default();
        entry.0.push(row.pump_price);
        entry.1 += row.volume;
    }

    let rows: Vec<FuelMonthlyDetailRow> = buckets
        .into_iter()
        .map(
            |((period, province, flag, product), (mut prices, total_volume))| {
                FuelMonthlyDetailRow {
                    period,
                    province,
                    flag,
                    product,
                    median_price: median(&mut prices),
                    total_volume,
                }
            },
        )
        .collect();

    fuel_monthly_detail_to_frame(&rows)
}
