//! Fuel-price series cleaner.
//!
//! The heaviest of the three: period parsing at month granularity, the
//! configured start cutoff, the pump-price floor, exact-duplicate removal,
//! and the controlled-vocabulary product mapping.

use super::{CleanReport, Cleaned};
use crate::domain::product::FuelProduct;
use crate::domain::rows::FuelRow;
use crate::error::TransformError;
use crate::frame::{self, fuel_to_frame};
use crate::schema;
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashSet;

const SOURCE: &str = "fuel";

const ALIASES: &[(&str, &str)] = &[
    ("periodo", "period"),
    ("provincia", "province"),
    ("bandera", "flag"),
    ("producto", "product"),
    ("precio_surtidor", "pump_price"),
    ("volumen", "volume"),
];

const REQUIRED: &[&str] = &["period", "province", "flag", "product", "pump_price", "volume"];

/// Pump prices below this are sentinel/garbage readings in the archive,
/// not zero-price promotions.
pub const PUMP_PRICE_FLOOR: f64 = 1.0;

/// The archive labels periods at month granularity ("2022/01"); converted
/// files sometimes carry full dates instead.
fn parse_period(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y/%m/%d") {
        return Some(d);
    }
    let (year, month) = s.split_once(['/', '-'])?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Clean the raw fuel frame into the canonical six-column artifact.
///
/// Rows whose product label has no entry in the canonical vocabulary are
/// dropped silently (counted and logged, never fatal).
pub fn clean_fuel(raw: &DataFrame, start: NaiveDate) -> Result<Cleaned, TransformError> {
    let mut df = raw.clone();
    schema::normalize_columns(&mut df, ALIASES)?;
    schema::ensure_required(&df, SOURCE, REQUIRED)?;

    let mut report = CleanReport {
        rows_in: df.height(),
        ..Default::default()
    };

    let periods = frame::coerce_dates(&df, "period", parse_period)?;
    let provinces = frame::coerce_str(&df, "province")?;
    let flags = frame::coerce_str(&df, "flag")?;
    let labels = frame::coerce_str(&df, "product")?;
    let prices = frame::coerce_f64(&df, "pump_price")?;
    let volumes = frame::coerce_f64(&df, "volume")?;

    // Domain filters first, then the null drop: a row failing both counts
    // as filtered, not null.
    let mut kept: Vec<(NaiveDate, String, String, String, f64, f64)> = Vec::new();
    for i in 0..df.height() {
        if let Some(period) = periods[i] {
            if period < start {
                report.before_cutoff_dropped += 1;
                continue;
            }
        }
        if let Some(price) = prices[i] {
            if price < PUMP_PRICE_FLOOR {
                report.below_floor_dropped += 1;
                continue;
            }
        }
        let (Some(period), Some(province), Some(flag), Some(label), Some(price), Some(volume)) = (
            periods[i],
            provinces[i].clone(),
            flags[i].clone(),
            labels[i].clone(),
            prices[i],
            volumes[i],
        ) else {
            report.null_dropped += 1;
            continue;
        };
        kept.push((period, province, flag, label, price, volume));
    }

    // Exact-duplicate removal over all columns, first occurrence kept.
    let mut seen = HashSet::new();
    let mut deduped = Vec::with_capacity(kept.len());
    for row in kept {
        let key = (
            row.0,
            row.1.clone(),
            row.2.clone(),
            row.3.clone(),
            row.4.to_bits(),
            row.5.to_bits(),
        );
        if seen.insert(key) {
            deduped.push(row);
        } else {
            report.duplicate_dropped += 1;
        }
    }

    // Controlled vocabulary: lowercased label → canonical product.
    let mut rows: Vec<FuelRow> = Vec::with_capacity(deduped.len());
    for (period, province, flag, label, pump_price, volume) in deduped {
        match FuelProduct::from_raw_label(&label) {
            Some(product) => rows.push(FuelRow {
                period,
                province,
                flag,
                product,
                pump_price,
                volume,
            }),
            None => report.unmapped_dropped += 1,
        }
    }

    rows.sort_by(|a, b| {
        (a.period, &a.province, &a.flag, a.product).cmp(&(b.period, &b.province, &b.flag, b.product))
    });

    report.rows_out = rows.len();
    report.log(SOURCE);

    Ok(Cleaned {
        frame: fuel_to_frame(&rows)?,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::fuel_rows;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn raw_frame(products: &[&str], prices: &[f64]) -> DataFrame {
        let n = products.len();
        df!(
            "Periodo" => &vec!["2024/01"; n],
            "Provincia" => &vec!["Buenos Aires"; n],
            "Bandera" => &vec!["YPF"; n],
            "Producto" => products,
            "Precio Surtidor" => prices,
            "Volumen" => &vec![1000.0; n],
        )
        .unwrap()
    }

    #[test]
    fn parses_month_granularity_periods() {
        assert_eq!(parse_period("2024/01"), Some(d(2024, 1, 1)));
        assert_eq!(parse_period("2024-01"), Some(d(2024, 1, 1)));
        assert_eq!(parse_period("2024-01-15"), Some(d(2024, 1, 15)));
        assert_eq!(parse_period("bogus"), None);
    }

    #[test]
    fn missing_product_column_raises_schema_error_before_row_processing() {
        let raw = df!(
            "Periodo" => &["2024/01"],
            "Provincia" => &["Buenos Aires"],
            "Bandera" => &["YPF"],
            "Precio Surtidor" => &[150.0],
            "Volumen" => &[1000.0],
        )
        .unwrap();

        let err = clean_fuel(&raw, d(2020, 1, 1)).unwrap_err();
        match err {
            TransformError::Schema(schema::SchemaError::MissingColumns { missing, .. }) => {
                assert_eq!(missing, vec!["product"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unmappable_products_are_dropped_and_counted() {
        let raw = raw_frame(
            &["GNC", "n/d", "kerosene", "something new"],
            &[150.0, 151.0, 152.0, 153.0],
        );

        let cleaned = clean_fuel(&raw, d(2020, 1, 1)).unwrap();
        assert_eq!(cleaned.report.unmapped_dropped, 2);
        assert_eq!(cleaned.frame.height(), 2);
    }

    #[test]
    fn below_floor_prices_are_dropped() {
        let raw = raw_frame(&["GNC", "GNC"], &[0.5, 150.0]);

        let cleaned = clean_fuel(&raw, d(2020, 1, 1)).unwrap();
        assert_eq!(cleaned.report.below_floor_dropped, 1);

        let rows = fuel_rows(&cleaned.frame).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pump_price, 150.0);
    }

    #[test]
    fn periods_before_the_cutoff_are_dropped() {
        let raw = df!(
            "Periodo" => &["2019/06", "2024/01"],
            "Provincia" => &["Salta", "Salta"],
            "Bandera" => &["Shell", "Shell"],
            "Producto" => &["GNC", "GNC"],
            "Precio Surtidor" => &[80.0, 150.0],
            "Volumen" => &[500.0, 600.0],
        )
        .unwrap();

        let cleaned = clean_fuel(&raw, d(2020, 1, 1)).unwrap();
        assert_eq!(cleaned.report.before_cutoff_dropped, 1);
        assert_eq!(cleaned.frame.height(), 1);
    }

    #[test]
    fn exact_duplicates_collapse_to_one_row() {
        let raw = raw_frame(&["GNC", "GNC", "GNC"], &[150.0, 150.0, 151.0]);

        let cleaned = clean_fuel(&raw, d(2020, 1, 1)).unwrap();
        assert_eq!(cleaned.report.duplicate_dropped, 1);
        assert_eq!(cleaned.frame.height(), 2);
    }

    #[test]
    fn products_are_mapped_to_canonical_labels() {
        let raw = raw_frame(
            &["Nafta (Super) entre 92 y 95 RON", "gas oil grado 3"],
            &[150.0, 160.0],
        );

        let cleaned = clean_fuel(&raw, d(2020, 1, 1)).unwrap();
        let rows = fuel_rows(&cleaned.frame).unwrap();
        let products: Vec<FuelProduct> = rows.iter().map(|r| r.product).collect();
        assert_eq!(products, vec![FuelProduct::NaftaGrado2, FuelProduct::GasoilGrado3]);
    }

    #[test]
    fn nulls_in_required_fields_are_dropped() {
        let raw = df!(
            "Periodo" => &[Some("2024/01"), Some("2024/01")],
            "Provincia" => &[Some("Salta"), None],
            "Bandera" => &[Some("Shell"), Some("Shell")],
            "Producto" => &[Some("GNC"), Some("GNC")],
            "Precio Surtidor" => &[Some(150.0), Some(151.0)],
            "Volumen" => &[Some(500.0), Some(600.0)],
        )
        .unwrap();

        let cleaned = clean_fuel(&raw, d(2020, 1, 1)).unwrap();
        assert_eq!(cleaned.report.null_dropped, 1);
        assert_eq!(cleaned.frame.height(), 1);
    }
}
