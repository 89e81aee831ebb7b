//! Monthly aggregation.
//!
//! All aggregates are keyed by the calendar month-end label. The functions
//! take a clean artifact and assume the cleaner's invariants hold: a null
//! reaching this stage is an error, never a silent skip.

mod brent;
mod currency;
mod fuel;

pub use brent::{aggregate_brent_monthly, aggregate_brent_stats};
pub use currency::aggregate_currency_monthly;
pub use fuel::{aggregate_fuel_monthly, aggregate_fuel_monthly_detail};

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median with the even-bucket convention: mean of the two middle values.
pub(crate) fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_of_even_bucket_is_mean_of_middles() {
        let mut values = vec![100.0, 120.0];
        assert_eq!(median(&mut values), 110.0);
    }

    #[test]
    fn median_of_odd_bucket_is_middle_value() {
        let mut values = vec![120.0, 100.0, 300.0];
        assert_eq!(median(&mut values), 120.0);
    }

    #[test]
    fn mean_of_known_values() {
        assert_eq!(mean(&[80.0, 85.0, 90.0, 75.0, 70.0]), 80.0);
    }
}
