//! Brent series cleaner.

use super::{CleanReport, Cleaned};
use crate::domain::rows::BrentRow;
use crate::error::TransformError;
use crate::frame::{self, brent_to_frame};
use crate::schema;
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeMap;

const SOURCE: &str = "brent";

const ALIASES: &[(&str, &str)] = &[
    ("brent_price_usd", "price"),
    ("brent_price", "price"),
    ("close", "price"),
];

const REQUIRED: &[&str] = &["date", "price"];

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Clean the raw Brent frame: one price per calendar date, ascending.
/// Duplicated dates keep the last value seen, so a re-extracted window
/// overwrites what it overlaps.
pub fn clean_brent(raw: &DataFrame, start: Option<NaiveDate>) -> Result<Cleaned, TransformError> {
    let mut df = raw.clone();
    schema::normalize_columns(&mut df, ALIASES)?;
    schema::ensure_required(&df, SOURCE, REQUIRED)?;

    let mut report = CleanReport {
        rows_in: df.height(),
        ..Default::default()
    };

    let dates = frame::coerce_dates(&df, "date", parse_date)?;
    let prices = frame::coerce_f64(&df, "price")?;

    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, price) in dates.into_iter().zip(prices) {
        let (Some(date), Some(price)) = (date, price) else {
            report.null_dropped += 1;
            continue;
        };
        if let Some(cutoff) = start {
            if date < cutoff {
                report.before_cutoff_dropped += 1;
                continue;
            }
        }
        if by_date.insert(date, price).is_some() {
            report.duplicate_dropped += 1;
        }
    }

    let rows: Vec<BrentRow> = by_date
        .into_iter()
        .map(|(date, price)| BrentRow { date, price })
        .collect();

    report.rows_out = rows.len();
    report.log(SOURCE);

    Ok(Cleaned {
        frame: brent_to_frame(&rows)?,
        report,
    })
}
