//! Brent monthly aggregation.

use super::mean;
use crate::calendar::month_end;
use crate::domain::rows::{BrentMonthlyRow, BrentStatsRow};
use crate::error::TransformError;
use crate::frame::{self, brent_monthly_to_frame, brent_stats_to_frame};
use chrono::Datelike;
use polars::prelude::*;
use std::collections::BTreeMap;

fn monthly_buckets(clean: &DataFrame) -> Result<BTreeMap<(i32, u32), Vec<f64>>, TransformError> {
    let rows = frame::brent_rows(clean)?;
    let mut buckets: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for row in rows {
        buckets
            .entry((row.date.year(), row.date.month()))
            .or_default()
            .push(row.price);
    }
    Ok(buckets)
}

/// Monthly mean price, labeled with the month-end date.
pub fn aggregate_brent_monthly(clean: &DataFrame) -> Result<DataFrame, TransformError> {
    let rows: Vec<BrentMonthlyRow> = monthly_buckets(clean)?
        .into_iter()
        .map(|((year, month), prices)| BrentMonthlyRow {
            date: month_end(year, month),
            avg_price: mean(&prices),
        })
        .collect();
    brent_monthly_to_frame(&rows)
}

/// Monthly mean/min/max/count for analytics-grade consumers.
pub fn aggregate_brent_stats(clean: &DataFrame) -> Result<DataFrame, TransformError> {
    let rows: Vec<BrentStatsRow> = monthly_buckets(clean)?
        .into_iter()
        .map(|((year, month), prices)| {
            let min_price = prices.iter().copied().fold(f64::INFINITY, f64::min);
            let max_price = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            BrentStatsRow {
                date: month_end(year, month),
                avg_price: mean(&prices),
                min_price,
                max_price,
                record_count: prices.len() as u32,
            }
        })
        .collect();
    brent_stats_to_frame(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rows::BrentRow;
    use crate::frame::brent_to_frame;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn clean_frame(points: &[(NaiveDate, f64)]) -> DataFrame {
        let rows: Vec<BrentRow> = points
            .iter()
            .map(|&(date, price)| BrentRow { date, price })
            .collect();
        brent_to_frame(&rows).unwrap()
    }

    #[test]
    fn one_month_of_prices_averages_correctly() {
        let clean = clean_frame(&[
            (d(2022, 1, 3), 80.0),
            (d(2022, 1, 4), 85.0),
            (d(2022, 1, 5), 90.0),
            (d(2022, 1, 6), 75.0),
            (d(2022, 1, 7), 70.0),
        ]);

        let monthly = aggregate_brent_monthly(&clean).unwrap();
        assert_eq!(monthly.height(), 1);

        let avg = monthly.column("avg_price").unwrap().f64().unwrap();
        assert_eq!(avg.get(0), Some(80.0));
    }

    #[test]
    fn month_label_is_the_last_calendar_day() {
        let clean = clean_frame(&[(d(2022, 1, 15), 80.0)]);

        let monthly = aggregate_brent_monthly(&clean).unwrap();
        let dates = frame::date_values(&monthly, "date").unwrap();
        assert_eq!(dates, vec![d(2022, 1, 31)]);
    }

    #[test]
    fn months_split_into_separate_rows() {
        let clean = clean_frame(&[
            (d(2022, 1, 15), 80.0),
            (d(2022, 1, 16), 85.0),
            (d(2022, 2, 10), 90.0),
        ]);

        let monthly = aggregate_brent_monthly(&clean).unwrap();
        assert_eq!(monthly.height(), 2);

        let avg = monthly.column("avg_price").unwrap().f64().unwrap();
        assert_eq!(avg.get(0), Some(82.5));
        assert_eq!(avg.get(1), Some(90.0));
    }

    #[test]
    fn stats_variant_reports_min_max_count() {
        let clean = clean_frame(&[
            (d(2022, 1, 3), 80.0),
            (d(2022, 1, 4), 85.0),
            (d(2022, 1, 5), 90.0),
        ]);

        let stats = aggregate_brent_stats(&clean).unwrap();
        assert_eq!(stats.height(), 1);
        assert_eq!(stats.column("min_price").unwrap().f64().unwrap().get(0), Some(80.0));
        assert_eq!(stats.column("max_price").unwrap().f64().unwrap().get(0), Some(90.0));
        assert_eq!(stats.column("record_count").unwrap().u32().unwrap().get(0), Some(3));
    }
}
