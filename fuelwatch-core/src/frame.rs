//! Typed-row ↔ DataFrame bridging.
//!
//! Cleaners and aggregators compute over typed rows; artifacts cross stage
//! boundaries as DataFrames (and as Parquet on disk). The converters here
//! mirror each other: `*_to_frame` builds the canonical column set in a
//! fixed order, `*_rows` reads it back and treats any null as an upstream
//! invariant violation. The lenient `coerce_*` readers are for raw input
//! only — they turn unparsable values into `None` instead of failing.

use crate::domain::product::FuelProduct;
use crate::domain::rows::{
    BrentMonthlyRow, BrentRow, BrentStatsRow, CurrencyMonthlyRow, CurrencyRow,
    FuelMonthlyDetailRow, FuelMonthlyRow, FuelRow, RateSource,
};
use crate::error::TransformError;
use chrono::NaiveDate;
use polars::prelude::*;

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}

fn unsupported(column: &str, dtype: &DataType) -> TransformError {
    TransformError::UnsupportedType {
        column: column.to_string(),
        dtype: format!("{dtype:?}"),
    }
}

// ── Lenient readers for raw input (coerce-to-null, never raise) ─────

/// Read a column as dates, parsing strings with `parse`; anything
/// unparsable becomes `None`.
pub fn coerce_dates<F>(
    df: &DataFrame,
    name: &str,
    parse: F,
) -> Result<Vec<Option<NaiveDate>>, TransformError>
where
    F: Fn(&str) -> Option<NaiveDate>,
{
    let col = df.column(name)?;
    match col.dtype() {
        DataType::Date => Ok(col
            .date()?
            .into_iter()
            .map(|days| days.map(|d| epoch() + chrono::Duration::days(d as i64)))
            .collect()),
        DataType::String => Ok(col
            .str()?
            .into_iter()
            .map(|value| value.and_then(|s| parse(s)))
            .collect()),
        other => Err(unsupported(name, other)),
    }
}

/// Read a column as floats; numeric columns pass through, string columns
/// are parsed, and anything unparsable becomes `None`.
pub fn coerce_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, TransformError> {
    let col = df.column(name)?;
    match col.dtype() {
        DataType::Float64 => Ok(col.f64()?.into_iter().collect()),
        DataType::Int64 => Ok(col
            .i64()?
            .into_iter()
            .map(|value| value.map(|v| v as f64))
            .collect()),
        DataType::Int32 => Ok(col
            .i32()?
            .into_iter()
            .map(|value| value.map(|v| v as f64))
            .collect()),
        DataType::String => Ok(col
            .str()?
            .into_iter()
            .map(|value| value.and_then(|s| s.trim().parse::<f64>().ok()))
            .collect()),
        other => Err(unsupported(name, other)),
    }
}

/// Read a column as trimmed strings; empty cells become `None`.
pub fn coerce_str(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, TransformError> {
    let col = df.column(name)?;
    match col.dtype() {
        DataType::String => Ok(col
            .str()?
            .into_iter()
            .map(|value| {
                value.and_then(|s| {
                    let trimmed = s.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        Some(trimmed.to_string())
                    }
                })
            })
            .collect()),
        other => Err(unsupported(name, other)),
    }
}

// ── Strict readers for clean artifacts (null = invariant violation) ─

pub fn date_values(df: &DataFrame, name: &str) -> Result<Vec<NaiveDate>, TransformError> {
    let col = df.column(name)?;
    let ca = col.date().map_err(|_| unsupported(name, col.dtype()))?;
    let mut out = Vec::with_capacity(ca.len());
    for (i, days) in ca.into_iter().enumerate() {
        let days = days
            .ok_or_else(|| TransformError::Invariant(format!("null '{name}' at row {i}")))?;
        out.push(epoch() + chrono::Duration::days(days as i64));
    }
    Ok(out)
}

pub fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, TransformError> {
    let col = df.column(name)?;
    let ca = col.f64().map_err(|_| unsupported(name, col.dtype()))?;
    let mut out = Vec::with_capacity(ca.len());
    for (i, value) in ca.into_iter().enumerate() {
        let value = value
            .ok_or_else(|| TransformError::Invariant(format!("null '{name}' at row {i}")))?;
        out.push(value);
    }
    Ok(out)
}

pub fn str_values(df: &DataFrame, name: &str) -> Result<Vec<String>, TransformError> {
    let col = df.column(name)?;
    let ca = col.str().map_err(|_| unsupported(name, col.dtype()))?;
    let mut out = Vec::with_capacity(ca.len());
    for (i, value) in ca.into_iter().enumerate() {
        let value = value
            .ok_or_else(|| TransformError::Invariant(format!("null '{name}' at row {i}")))?;
        out.push(value.to_string());
    }
    Ok(out)
}

// ── Column builders ─────────────────────────────────────────────────

/// Build a Date column from chrono dates (stored as days since epoch).
pub fn date_column<I>(name: &str, dates: I) -> Result<Column, PolarsError>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: Vec<i32> = dates
        .into_iter()
        .map(|d| (d - epoch()).num_days() as i32)
        .collect();
    Column::new(name.into(), days).cast(&DataType::Date)
}

// ── Series frames ───────────────────────────────────────────────────

pub fn brent_to_frame(rows: &[BrentRow]) -> Result<DataFrame, TransformError> {
    let df = DataFrame::new(vec![
        date_column("date", rows.iter().map(|r| r.date))?,
        Column::new("price".into(), rows.iter().map(|r| r.price).collect::<Vec<f64>>()),
    ])?;
    Ok(df)
}

pub fn brent_rows(df: &DataFrame) -> Result<Vec<BrentRow>, TransformError> {
    let dates = date_values(df, "date")?;
    let prices = f64_values(df, "price")?;
    Ok(dates
        .into_iter()
        .zip(prices)
        .map(|(date, price)| BrentRow { date, price })
        .collect())
}

pub fn fuel_to_frame(rows: &[FuelRow]) -> Result<DataFrame, TransformError> {
    let df = DataFrame::new(vec![
        date_column("period", rows.iter().map(|r| r.period))?,
        Column::new(
            "province".into(),
            rows.iter().map(|r| r.province.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "flag".into(),
            rows.iter().map(|r| r.flag.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "product".into(),
            rows.iter().map(|r| r.product.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "pump_price".into(),
            rows.iter().map(|r| r.pump_price).collect::<Vec<f64>>(),
        ),
        Column::new(
            "volume".into(),
            rows.iter().map(|r| r.volume).collect::<Vec<f64>>(),
        ),
    ])?;
    Ok(df)
}

pub fn fuel_rows(df: &DataFrame) -> Result<Vec<FuelRow>, TransformError> {
    let periods = date_values(df, "period")?;
    let provinces = str_values(df, "province")?;
    let flags = str_values(df, "flag")?;
    let products = str_values(df, "product")?;
    let prices = f64_values(df, "pump_price")?;
    let volumes = f64_values(df, "volume")?;

    let mut rows = Vec::with_capacity(periods.len());
    for i in 0..periods.len() {
        let product = FuelProduct::from_canonical(&products[i]).ok_or_else(|| {
            TransformError::Invariant(format!(
                "non-canonical product '{}' at row {i}",
                products[i]
            ))
        })?;
        rows.push(FuelRow {
            period: periods[i],
            province: provinces[i].clone(),
            flag: flags[i].clone(),
            product,
            pump_price: prices[i],
            volume: volumes[i],
        });
    }
    Ok(rows)
}

pub fn currency_to_frame(rows: &[CurrencyRow]) -> Result<DataFrame, TransformError> {
    let df = DataFrame::new(vec![
        date_column("date", rows.iter().map(|r| r.date))?,
        Column::new(
            "source".into(),
            rows.iter().map(|r| r.source.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "buy_rate".into(),
            rows.iter().map(|r| r.buy_rate).collect::<Vec<f64>>(),
        ),
        Column::new(
            "sell_rate".into(),
            rows.iter().map(|r| r.sell_rate).collect::<Vec<f64>>(),
        ),
    ])?;
    Ok(df)
}

pub fn currency_rows(df: &DataFrame) -> Result<Vec<CurrencyRow>, TransformError> {
    let dates = date_values(df, "date")?;
    let sources = str_values(df, "source")?;
    let buys = f64_values(df, "buy_rate")?;
    let sells = f64_values(df, "sell_rate")?;

    let mut rows = Vec::with_capacity(dates.len());
    for i in 0..dates.len() {
        let source = RateSource::from_label(&sources[i]).ok_or_else(|| {
            TransformError::Invariant(format!("unknown rate source '{}' at row {i}", sources[i]))
        })?;
        rows.push(CurrencyRow {
            date: dates[i],
            source,
            buy_rate: buys[i],
            sell_rate: sells[i],
        });
    }
    Ok(rows)
}

// ── Monthly frames ──────────────────────────────────────────────────

pub fn brent_monthly_to_frame(rows: &[BrentMonthlyRow]) -> Result<DataFrame, TransformError> {
    let df = DataFrame::new(vec![
        date_column("date", rows.iter().map(|r| r.date))?,
        Column::new(
            "avg_price".into(),
            rows.iter().map(|r| r.avg_price).collect::<Vec<f64>>(),
        ),
    ])?;
    Ok(df)
}

pub fn brent_stats_to_frame(rows: &[BrentStatsRow]) -> Result<DataFrame, TransformError> {
    let df = DataFrame::new(vec![
        date_column("date", rows.iter().map(|r| r.date))?,
        Column::new(
            "avg_price".into(),
            rows.iter().map(|r| r.avg_price).collect::<Vec<f64>>(),
        ),
        Column::new(
            "min_price".into(),
            rows.iter().map(|r| r.min_price).collect::<Vec<f64>>(),
        ),
        Column::new(
            "max_price".into(),
            rows.iter().map(|r| r.max_price).collect::<Vec<f64>>(),
        ),
        Column::new(
            "record_count".into(),
            rows.iter().map(|r| r.record_count).collect::<Vec<u32>>(),
        ),
    ])?;
    Ok(df)
}

pub fn fuel_monthly_to_frame(rows: &[FuelMonthlyRow]) -> Result<DataFrame, TransformError> {
    let df = DataFrame::new(vec![
        date_column("period", rows.iter().map(|r| r.period))?,
        Column::new(
            "product".into(),
            rows.iter().map(|r| r.product.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "median_price".into(),
            rows.iter().map(|r| r.median_price).collect::<Vec<f64>>(),
        ),
        Column::new(
            "total_volume".into(),
            rows.iter().map(|r| r.total_volume).collect::<Vec<f64>>(),
        ),
    ])?;
    Ok(df)
}

pub fn fuel_monthly_detail_to_frame(
    rows: &[FuelMonthlyDetailRow],
) -> Result<DataFrame, TransformError> {
    let df = DataFrame::new(vec![
        date_column("period", rows.iter().map(|r| r.period))?,
        Column::new(
            "province".into(),
            rows.iter().map(|r| r.province.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "flag".into(),
            rows.iter().map(|r| r.flag.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "product".into(),
            rows.iter().map(|r| r.product.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "median_price".into(),
            rows.iter().map(|r| r.median_price).collect::<Vec<f64>>(),
        ),
        Column::new(
            "total_volume".into(),
            rows.iter().map(|r| r.total_volume).collect::<Vec<f64>>(),
        ),
    ])?;
    Ok(df)
}

pub fn currency_monthly_to_frame(
    rows: &[CurrencyMonthlyRow],
) -> Result<DataFrame, TransformError> {
    let df = DataFrame::new(vec![
        date_column("date", rows.iter().map(|r| r.date))?,
        Column::new(
            "official_rate".into(),
            rows.iter().map(|r| r.official_rate).collect::<Vec<f64>>(),
        ),
        Column::new(
            "parallel_rate".into(),
            rows.iter().map(|r| r.parallel_rate).collect::<Vec<f64>>(),
        ),
        Column::new(
            "spread_pct".into(),
            rows.iter().map(|r| r.spread_pct).collect::<Vec<f64>>(),
        ),
    ])?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn brent_frame_round_trips() {
        let rows = vec![
            BrentRow { date: d(2024, 1, 2), price: 80.5 },
            BrentRow { date: d(2024, 1, 3), price: 81.0 },
        ];

        let df = brent_to_frame(&rows).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);

        let back = brent_rows(&df).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn fuel_frame_round_trips() {
        let rows = vec![FuelRow {
            period: d(2024, 1, 1),
            province: "Buenos Aires".into(),
            flag: "YPF".into(),
            product: FuelProduct::NaftaGrado2,
            pump_price: 150.0,
            volume: 1000.0,
        }];

        let df = fuel_to_frame(&rows).unwrap();
        let back = fuel_rows(&df).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn currency_frame_round_trips() {
        let rows = vec![
            CurrencyRow { date: d(2024, 1, 2), source: RateSource::Official, buy_rate: 98.0, sell_rate: 100.0 },
            CurrencyRow { date: d(2024, 1, 2), source: RateSource::Parallel, buy_rate: 175.0, sell_rate: 180.0 },
        ];

        let df = currency_to_frame(&rows).unwrap();
        let back = currency_rows(&df).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn coerce_f64_parses_strings_and_nulls_garbage() {
        let df = df!("pump_price" => &[Some("150.5"), Some("junk"), None]).unwrap();

        let values = coerce_f64(&df, "pump_price").unwrap();
        assert_eq!(values, vec![Some(150.5), None, None]);
    }

    #[test]
    fn coerce_dates_nulls_unparsable_values() {
        let df = df!("date" => &["2024-01-02", "not a date"]).unwrap();

        let parse = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
        let values = coerce_dates(&df, "date", parse).unwrap();
        assert_eq!(values, vec![Some(d(2024, 1, 2)), None]);
    }

    #[test]
    fn strict_readers_reject_nulls() {
        let df = df!("price" => &[Some(80.0), None]).unwrap();

        let err = f64_values(&df, "price").unwrap_err();
        assert!(matches!(err, TransformError::Invariant(_)));
    }

    #[test]
    fn non_canonical_product_is_an_invariant_violation() {
        let df = DataFrame::new(vec![
            date_column("period", vec![d(2024, 1, 1)]).unwrap(),
            Column::new("province".into(), vec!["X"]),
            Column::new("flag".into(), vec!["Y"]),
            Column::new("product".into(), vec!["something else"]),
            Column::new("pump_price".into(), vec![10.0]),
            Column::new("volume".into(), vec![1.0]),
        ])
        .unwrap();

        let err = fuel_rows(&df).unwrap_err();
        assert!(matches!(err, TransformError::Invariant(_)));
    }
}
