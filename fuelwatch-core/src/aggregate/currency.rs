//! Currency monthly aggregation.
//!
//! Pivots the long-format quotes into wide columns per source using the
//! sell rate, resamples to monthly means, then derives the spread. The
//! spread exists only here: it is a relationship between the two pivoted
//! series, not a per-quote fact.

use super::mean;
use crate::calendar::month_end;
use crate::domain::rows::{CurrencyMonthlyRow, RateSource};
use crate::error::TransformError;
use crate::frame::{self, currency_monthly_to_frame};
use chrono::Datelike;
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::warn;

/// Monthly wide-pivoted rates plus the percentage spread between them.
pub fn aggregate_currency_monthly(clean: &DataFrame) -> Result<DataFrame, TransformError> {
    let rows = frame::currency_rows(clean)?;

    let mut buckets: BTreeMap<(i32, u32), (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for row in rows {
        let entry = buckets
            .entry((row.date.year(), row.date.month()))
            .or_default();
        match row.source {
            RateSource::Official => entry.0.push(row.sell_rate),
            RateSource::Parallel => entry.1.push(row.sell_rate),
        }
    }

    let mut out = Vec::with_capacity(buckets.len());
    for ((year, month), (official, parallel)) in buckets {
        if official.is_empty() || parallel.is_empty() {
            warn!(year, month, "month is missing one rate source; skipping");
            continue;
        }
        let official_rate = mean(&official);
        let parallel_rate = mean(&parallel);
        out.push(CurrencyMonthlyRow {
            date: month_end(year, month),
            official_rate,
            parallel_rate,
            spread_pct: (parallel_rate - official_rate) / official_rate * 100.0,
        });
    }

    currency_monthly_to_frame(&out)
}
