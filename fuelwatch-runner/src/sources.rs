//! Source readers at the extraction boundary.
//!
//! Thin wrappers only: fetch the two quote APIs, read flat files from
//! `{data_dir}/raw/`, and land fetched data back there as CSV. The fuel
//! archive itself is produced by an external conversion step and is
//! expected to already be on disk. Everything interesting happens
//! downstream of these readers.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const BRENT_RAW: &str = "brent_prices.csv";
pub const FUEL_RAW: &str = "fuel_prices.csv";
pub const CURRENCY_RAW: &str = "currency_rates.csv";

/// Brent futures symbol on the market-data API.
const BRENT_SYMBOL: &str = "BZ=F";

const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const CURRENCY_URL: &str = "https://api.bluelytics.com.ar/v2/evolution.json";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source '{source_name}' unavailable: {reason}")]
    Unavailable { source_name: String, reason: String },

    #[error("source '{source_name}' returned no rows")]
    Empty { source_name: String },

    #[error("raw file io error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("raw read error: {0}")]
    Frame(#[from] PolarsError),
}

pub fn raw_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("raw")
}

/// Read one raw CSV into a DataFrame. Schema is inferred; the cleaners
/// own typing.
pub fn read_raw_csv(path: &Path) -> Result<DataFrame, SourceError> {
    if !path.exists() {
        return Err(SourceError::Unavailable {
            source_name: path.display().to_string(),
            reason: "file not found".to_string(),
        });
    }
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .finish()?
        .collect()?;
    Ok(df)
}

/// One daily Brent settlement from the market-data API.
#[derive(Debug, Clone, PartialEq)]
pub struct BrentQuote {
    pub date: NaiveDate,
    pub price: f64,
}

/// One quote row from the currency API (long format, one row per source).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrencyQuote {
    pub date: String,
    pub source: String,
    pub value_buy: f64,
    pub value_sell: f64,
}

// ── Market-data API response (chart endpoint) ───────────────────────

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

fn parse_chart(response: ChartResponse) -> Result<Vec<BrentQuote>, SourceError> {
    let unavailable = |reason: &str| SourceError::Unavailable {
        source_name: "brent".to_string(),
        reason: reason.to_string(),
    };

    let data = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| unavailable("empty chart result"))?;

    let timestamps = data.timestamp.ok_or_else(|| unavailable("no timestamps"))?;
    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| unavailable("no quote data"))?;

    let mut quotes = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = chrono::DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.naive_utc().date())
            .ok_or_else(|| unavailable("invalid timestamp"))?;
        // Non-trading days come back as null closes; skip them.
        if let Some(price) = quote.close.get(i).copied().flatten() {
            quotes.push(BrentQuote { date, price });
        }
    }

    if quotes.is_empty() {
        return Err(SourceError::Empty {
            source_name: "brent".to_string(),
        });
    }
    Ok(quotes)
}

// ── The HTTP client ─────────────────────────────────────────────────

pub struct QuoteClient {
    client: reqwest::blocking::Client,
}

impl QuoteClient {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }

    /// Daily Brent settlements over `[start, end]`.
    pub fn fetch_brent(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BrentQuote>, SourceError> {
        let start_ts = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        let end_ts = end.and_hms_opt(23, 59, 59).unwrap().and_utc().timestamp();
        let url = format!(
            "{CHART_URL}/{BRENT_SYMBOL}?period1={start_ts}&period2={end_ts}&interval=1d"
        );

        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| SourceError::Unavailable {
                source_name: "brent".to_string(),
                reason: e.to_string(),
            })?;

        let chart: ChartResponse = response.json().map_err(|e| SourceError::Unavailable {
            source_name: "brent".to_string(),
            reason: format!("response format changed: {e}"),
        })?;

        let quotes = parse_chart(chart)?;
        info!(rows = quotes.len(), "fetched brent quotes");
        Ok(quotes)
    }

    /// Full quote history from the currency API, windowed to `start` and
    /// later. The API returns everything; we filter client-side like any
    /// other consumer.
    pub fn fetch_currency(&self, start: NaiveDate) -> Result<Vec<CurrencyQuote>, SourceError> {
        let response = self
            .client
            .get(CURRENCY_URL)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| SourceError::Unavailable {
                source_name: "currency".to_string(),
                reason: e.to_string(),
            })?;

        let quotes: Vec<CurrencyQuote> =
            response.json().map_err(|e| SourceError::Unavailable {
                source_name: "currency".to_string(),
                reason: format!("response format changed: {e}"),
            })?;

        let windowed = window_currency(quotes, start);
        if windowed.is_empty() {
            return Err(SourceError::Empty {
                source_name: "currency".to_string(),
            });
        }
        info!(rows = windowed.len(), "fetched currency quotes");
        Ok(windowed)
    }
}

impl Default for QuoteClient {
    fn default() -> Self {
        Self::new()
    }
}

fn window_currency(quotes: Vec<CurrencyQuote>, start: NaiveDate) -> Vec<CurrencyQuote> {
    quotes
        .into_iter()
        .filter(|q| {
            NaiveDate::parse_from_str(&q.date, "%Y-%m-%d")
                .map(|d| d >= start)
                .unwrap_or(false)
        })
        .collect()
}

// ── Raw CSV writers ─────────────────────────────────────────────────

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> SourceError + '_ {
    move |source| SourceError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Land fetched Brent quotes as the raw CSV the transform stage reads.
pub fn write_brent_csv(dir: &Path, quotes: &[BrentQuote]) -> Result<PathBuf, SourceError> {
    std::fs::create_dir_all(dir).map_err(io_err(dir))?;
    let path = dir.join(BRENT_RAW);

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["date", "brent_price_usd"])?;
    for quote in quotes {
        writer.write_record([
            quote.date.format("%Y-%m-%d").to_string(),
            quote.price.to_string(),
        ])?;
    }
    writer.flush().map_err(io_err(&path))?;
    Ok(path)
}

/// Land fetched currency quotes as the raw CSV the transform stage reads.
pub fn write_currency_csv(dir: &Path, quotes: &[CurrencyQuote]) -> Result<PathBuf, SourceError> {
    std::fs::create_dir_all(dir).map_err(io_err(dir))?;
    let path = dir.join(CURRENCY_RAW);

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["date", "source", "value_buy", "value_sell"])?;
    for quote in quotes {
        writer.write_record([
            quote.date.clone(),
            quote.source.clone(),
            quote.value_buy.to_string(),
            quote.value_sell.to_string(),
        ])?;
    }
    writer.flush().map_err(io_err(&path))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parse_chart_skips_null_closes() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704153600, 1704240000, 1704326400],
                    "indicators": { "quote": [{ "close": [78.5, null, 79.1] }] }
                }]
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(json).unwrap();
        let quotes = parse_chart(response).unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].price, 78.5);
        assert_eq!(quotes[1].price, 79.1);
    }

    #[test]
    fn parse_chart_empty_result_is_unavailable() {
        let json = r#"{ "chart": { "result": null } }"#;

        let response: ChartResponse = serde_json::from_str(json).unwrap();
        let err = parse_chart(response).unwrap_err();
        assert!(matches!(err, SourceError::Unavailable { .. }));
    }

    #[test]
    fn currency_window_filters_by_start_date() {
        let quotes = vec![
            CurrencyQuote {
                date: "2021-12-31".into(),
                source: "Oficial".into(),
                value_buy: 98.0,
                value_sell: 100.0,
            },
            CurrencyQuote {
                date: "2022-01-03".into(),
                source: "Blue".into(),
                value_buy: 175.0,
                value_sell: 180.0,
            },
        ];

        let windowed = window_currency(quotes, d(2022, 1, 1));
        assert_eq!(windowed.len(), 1);
        assert_eq!(windowed[0].source, "Blue");
    }

    #[test]
    fn raw_csv_round_trips_through_the_reader() {
        let dir = std::env::temp_dir().join(format!("fuelwatch_sources_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let quotes = vec![
            BrentQuote { date: d(2024, 1, 2), price: 78.5 },
            BrentQuote { date: d(2024, 1, 3), price: 79.1 },
        ];
        let path = write_brent_csv(&dir, &quotes).unwrap();

        let df = read_raw_csv(&path).unwrap();
        assert_eq!(df.height(), 2);
        let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["date", "brent_price_usd"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_raw_file_is_unavailable() {
        let err = read_raw_csv(Path::new("/nonexistent/brent.csv")).unwrap_err();
        assert!(matches!(err, SourceError::Unavailable { .. }));
    }
}
