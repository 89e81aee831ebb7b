//! Currency series cleaner.
//!
//! Quotes stay in long format at rest: two rows per date, one per source.
//! The wide pivot (and the spread derived from it) only happens at
//! aggregation time.

use super::{CleanReport, Cleaned};
use crate::domain::rows::{CurrencyRow, RateSource};
use crate::error::TransformError;
use crate::frame::{self, currency_to_frame};
use crate::schema;
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeMap;

const SOURCE: &str = "currency";

const ALIASES: &[(&str, &str)] = &[
    ("fecha", "date"),
    ("value_buy", "buy_rate"),
    ("value_sell", "sell_rate"),
];

const REQUIRED: &[&str] = &["date", "source", "buy_rate", "sell_rate"];

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Clean the raw quote frame: (date, source) unique, keep-last on
/// conflict, sources outside {official, parallel} dropped.
pub fn clean_currency(
    raw: &DataFrame,
    start: Option<NaiveDate>,
) -> Result<Cleaned, TransformError> {
    let mut df = raw.clone();
    schema::normalize_columns(&mut df, ALIASES)?;
    schema::ensure_required(&df, SOURCE, REQUIRED)?;

    let mut report = CleanReport {
        rows_in: df.height(),
        ..Default::default()
    };

    let dates = frame::coerce_dates(&df, "date", parse_date)?;
    let labels = frame::coerce_str(&df, "source")?;
    let buys = frame::coerce_f64(&df, "buy_rate")?;
    let sells = frame::coerce_f64(&df, "sell_rate")?;

    let mut by_key: BTreeMap<(NaiveDate, RateSource), (f64, f64)> = BTreeMap::new();
    for i in 0..df.height() {
        let (Some(date), Some(label), Some(buy), Some(sell)) =
            (dates[i], labels[i].clone(), buys[i], sells[i])
        else {
            report.null_dropped += 1;
            continue;
        };
        if let Some(cutoff) = start {
            if date < cutoff {
                report.before_cutoff_dropped += 1;
                continue;
            }
        }
        let Some(source) = RateSource::from_label(&label) else {
            report.unmapped_dropped += 1;
            continue;
        };
        if by_key.insert((date, source), (buy, sell)).is_some() {
            report.duplicate_dropped += 1;
        }
    }

    let rows: Vec<CurrencyRow> = by_key
        .into_iter()
        .map(|((date, source), (buy_rate, sell_rate))| CurrencyRow {
            date,
            source,
            buy_rate,
            sell_rate,
        })
        .collect();

    report.rows_out = rows.len();
    report.log(SOURCE);

    Ok(Cleaned {
        frame: currency_to_frame(&rows)?,
        report,
    })
}
