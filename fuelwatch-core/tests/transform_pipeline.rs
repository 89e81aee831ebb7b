//! End-to-end transform checks: raw frame → clean → aggregate for all
//! three series, asserting the clean-artifact invariants a loader relies on.

use chrono::NaiveDate;
use fuelwatch_core::aggregate::{
    aggregate_brent_monthly, aggregate_currency_monthly, aggregate_fuel_monthly,
};
use fuelwatch_core::clean::{clean_brent, clean_currency, clean_fuel};
use fuelwatch_core::domain::FuelProduct;
use fuelwatch_core::frame;
use polars::prelude::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn brent_raw_to_monthly_average() {
    let raw = df!(
        "Date" => &[
            Some("2022-01-03"), Some("2022-01-04"), Some("2022-01-05"),
            Some("2022-01-06"), Some("2022-01-07"), None, Some("2022-01-03"),
        ],
        "brent_price_usd" => &[
            Some(80.0), Some(85.0), Some(90.0), Some(75.0), Some(70.0),
            Some(99.0), Some(80.0),
        ],
    )
    .unwrap();

    let cleaned = clean_brent(&raw, None).unwrap();

    // One row per date, sorted, no nulls.
    let rows = frame::brent_rows(&cleaned.frame).unwrap();
    assert_eq!(rows.len(), 5);
    assert!(rows.windows(2).all(|w| w[0].date < w[1].date));

    let monthly = aggregate_brent_monthly(&cleaned.frame).unwrap();
    assert_eq!(monthly.height(), 1);

    let dates = frame::date_values(&monthly, "date").unwrap();
    assert_eq!(dates, vec![d(2022, 1, 31)]);
    assert_eq!(
        monthly.column("avg_price").unwrap().f64().unwrap().get(0),
        Some(80.0)
    );
}

#[test]
fn fuel_raw_to_monthly_median_and_volume() {
    let raw = df!(
        "Periodo" => &["2022/01", "2022/01", "2022/01", "2019/05"],
        "Provincia" => &["Salta", "Jujuy", "Salta", "Salta"],
        "Bandera" => &["YPF", "YPF", "Shell", "YPF"],
        "Producto" => &["GNC", "GNC", "n/d", "GNC"],
        "Precio Surtidor" => &[100.0, 120.0, 130.0, 90.0],
        "Volumen" => &[1000.0, 2000.0, 500.0, 100.0],
    )
    .unwrap();

    let cleaned = clean_fuel(&raw, d(2020, 1, 1)).unwrap();

    // The n/d row and the pre-cutoff row are gone; survivors are canonical.
    assert_eq!(cleaned.report.unmapped_dropped, 1);
    assert_eq!(cleaned.report.before_cutoff_dropped, 1);
    let rows = frame::fuel_rows(&cleaned.frame).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.pump_price >= 1.0));
    assert!(rows
        .iter()
        .all(|r| FuelProduct::from_canonical(r.product.as_str()).is_some()));

    let monthly = aggregate_fuel_monthly(&cleaned.frame).unwrap();
    assert_eq!(monthly.height(), 1);
    assert_eq!(
        monthly.column("median_price").unwrap().f64().unwrap().get(0),
        Some(110.0)
    );
    assert_eq!(
        monthly.column("total_volume").unwrap().f64().unwrap().get(0),
        Some(3000.0)
    );

    let periods = frame::date_values(&monthly, "period").unwrap();
    assert_eq!(periods, vec![d(2022, 1, 31)]);
}

#[test]
fn currency_raw_to_monthly_spread() {
    let raw = df!(
        "fecha" => &["2022-01-03", "2022-01-03", "2022-01-04", "2022-01-04"],
        "source" => &["Oficial", "Blue", "Oficial", "Blue"],
        "value_buy" => &[98.0, 175.0, 100.0, 179.0],
        "value_sell" => &[100.0, 180.0, 102.0, 184.0],
    )
    .unwrap();

    let cleaned = clean_currency(&raw, None).unwrap();

    // (date, source) unique, long format.
    let rows = frame::currency_rows(&cleaned.frame).unwrap();
    assert_eq!(rows.len(), 4);

    let monthly = aggregate_currency_monthly(&cleaned.frame).unwrap();
    assert_eq!(monthly.height(), 1);

    let official = monthly.column("official_rate").unwrap().f64().unwrap().get(0).unwrap();
    let parallel = monthly.column("parallel_rate").unwrap().f64().unwrap().get(0).unwrap();
    let spread = monthly.column("spread_pct").unwrap().f64().unwrap().get(0).unwrap();
    assert_eq!(official, 101.0);
    assert_eq!(parallel, 182.0);
    assert!((spread - 80.198).abs() < 1e-3);
}

#[test]
fn vocabulary_drop_reduces_count_by_exactly_the_unmappable_rows() {
    let raw = df!(
        "Periodo" => &["2022/01", "2022/01", "2022/01", "2022/01", "2022/01"],
        "Provincia" => &["A", "B", "C", "D", "E"],
        "Bandera" => &["X", "X", "X", "X", "X"],
        "Producto" => &["GNC", "mystery blend", "KEROSENE", "n/d", "GLPA"],
        "Precio Surtidor" => &[100.0, 100.0, 100.0, 100.0, 100.0],
        "Volumen" => &[1.0, 1.0, 1.0, 1.0, 1.0],
    )
    .unwrap();

    let cleaned = clean_fuel(&raw, d(2020, 1, 1)).unwrap();
    assert_eq!(cleaned.report.rows_in, 5);
    assert_eq!(cleaned.report.unmapped_dropped, 2);
    assert_eq!(cleaned.frame.height(), 5 - 2);
}
