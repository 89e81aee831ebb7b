//! Calendar-month bucketing helpers.
//!
//! Monthly artifacts are labeled with the last calendar day of the month
//! (resampling convention), not the first. Consumers joining on the period
//! label rely on this exactly.

use chrono::{Datelike, NaiveDate};

/// Last calendar day of the given month. `month` must be 1..=12.
pub fn month_end(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .pred_opt()
        .unwrap()
}

/// Month-end label for the month containing `date`.
pub fn month_end_of(date: NaiveDate) -> NaiveDate {
    month_end(date.year(), date.month())
}
