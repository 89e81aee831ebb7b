//! Typed rows for the three series and their monthly aggregates.

use super::product::FuelProduct;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Daily Brent settlement, USD per barrel. One row per calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrentRow {
    pub date: NaiveDate,
    pub price: f64,
}

/// One pump-price observation from the government archive: a month-granular
/// period plus the station dimensions it was reported under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelRow {
    pub period: NaiveDate,
    pub province: String,
    pub flag: String,
    pub product: FuelProduct,
    pub pump_price: f64,
    pub volume: f64,
}

/// Quote origin for the currency series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Official,
    Parallel,
}

impl RateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateSource::Official => "official",
            RateSource::Parallel => "parallel",
        }
    }

    /// Accepts the raw quote-API labels as well as the canonical names.
    pub fn from_label(label: &str) -> Option<RateSource> {
        match label.trim().to_lowercase().as_str() {
            "official" | "oficial" => Some(RateSource::Official),
            "parallel" | "blue" => Some(RateSource::Parallel),
            _ => None,
        }
    }
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One daily quote from one source (long format; (date, source) is unique).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRow {
    pub date: NaiveDate,
    pub source: RateSource,
    pub buy_rate: f64,
    pub sell_rate: f64,
}

// ── Monthly aggregates (dates are calendar month-ends) ──────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrentMonthlyRow {
    pub date: NaiveDate,
    pub avg_price: f64,
}

/// Richer Brent statistics for analytics-grade consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrentStatsRow {
    pub date: NaiveDate,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub record_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelMonthlyRow {
    pub period: NaiveDate,
    pub product: FuelProduct,
    pub median_price: f64,
    pub total_volume: f64,
}

/// Finer-grained fuel aggregate keeping the station dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelMonthlyDetailRow {
    pub period: NaiveDate,
    pub province: String,
    pub flag: String,
    pub product: FuelProduct,
    pub median_price: f64,
    pub total_volume: f64,
}

/// Wide-pivoted monthly currency rates. The spread only exists here: it is
/// a relationship between the two pivoted series, not a per-quote fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyMonthlyRow {
    pub date: NaiveDate,
    pub official_rate: f64,
    pub parallel_rate: f64,
    pub spread_pct: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_source_accepts_api_labels() {
        assert_eq!(RateSource::from_label("Oficial"), Some(RateSource::Official));
        assert_eq!(RateSource::from_label("Blue"), Some(RateSource::Parallel));
        assert_eq!(RateSource::from_label("official"), Some(RateSource::Official));
        assert_eq!(RateSource::from_label("oficial_turista"), None);
    }

    #[test]
    fn rate_source_orders_official_first() {
        assert!(RateSource::Official < RateSource::Parallel);
    }
}
