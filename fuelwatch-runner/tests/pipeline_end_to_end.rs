//! Full offline pipeline run over synthetic raw data: seed → extract →
//! transform → both loads, then a second run to confirm convergence.

use chrono::NaiveDate;
use fuelwatch_runner::config::PipelineConfig;
use fuelwatch_runner::pipeline::{run_extract, run_load, run_pipeline, run_transform};
use fuelwatch_runner::sources::{self, write_brent_csv, write_currency_csv};
use fuelwatch_runner::synthetic::{
    synthetic_brent, synthetic_currency, synthetic_fuel, write_fuel_csv,
};
use fuelwatch_runner::warehouse::{open, Destination};
use rusqlite::Connection;
use tempfile::TempDir;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn seeded_config(dir: &TempDir) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.pipeline.data_dir = dir.path().join("data");
    config.staging.db_path = dir.path().join("warehouse/staging.db");
    config.analytics.db_path = dir.path().join("warehouse/analytics.db");
    config.sources.brent_start = d(2024, 1, 1);
    config.sources.fuel_start = d(2024, 1, 1);
    config.sources.currency_start = d(2024, 1, 1);

    let raw = sources::raw_dir(config.data_dir());
    write_brent_csv(&raw, &synthetic_brent(d(2024, 1, 1), d(2024, 3, 31))).unwrap();
    write_currency_csv(&raw, &synthetic_currency(d(2024, 1, 1), d(2024, 3, 31))).unwrap();
    write_fuel_csv(&raw, &synthetic_fuel(d(2024, 1, 1), 3, 60)).unwrap();

    config
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT count(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn offline_run_loads_both_destinations() {
    let dir = TempDir::new().unwrap();
    let config = seeded_config(&dir);

    let extract = run_extract(&config, true).unwrap();
    assert!(extract.brent_rows > 0);
    assert!(extract.fuel_rows > 0);
    assert!(extract.currency_rows > 0);

    let transform = run_transform(&config).unwrap();
    assert!(transform.brent.rows_out > 0);
    assert!(transform.fuel.rows_out > 0);
    // Three months of data → three monthly rows for brent and currency.
    assert_eq!(transform.brent_monthly_rows, 3);
    assert_eq!(transform.currency_monthly_rows, 3);

    let staging_report = run_load(&config, Destination::Staging).unwrap();
    let analytics_report = run_load(&config, Destination::Analytics).unwrap();
    assert!(staging_report.total_rows() > 0);
    assert!(analytics_report.total_rows() > 0);

    let staging = open(Destination::Staging, &config.staging.db_path).unwrap();
    assert_eq!(count(&staging, "brent_price") as usize, transform.brent.rows_out);
    assert_eq!(count(&staging, "fuel_prices") as usize, transform.fuel.rows_out);
    assert_eq!(
        count(&staging, "currency_rates") as usize,
        transform.currency.rows_out
    );

    let analytics = open(Destination::Analytics, &config.analytics.db_path).unwrap();
    assert_eq!(count(&analytics, "brent_monthly"), 3);
    assert_eq!(count(&analytics, "currency_monthly"), 3);
    assert_eq!(
        count(&analytics, "fuel_monthly") as usize,
        transform.fuel_monthly_rows
    );
}

#[test]
fn rerunning_the_loads_converges() {
    let dir = TempDir::new().unwrap();
    let config = seeded_config(&dir);

    run_extract(&config, true).unwrap();
    run_transform(&config).unwrap();

    let first = run_load(&config, Destination::Analytics).unwrap();
    let second = run_load(&config, Destination::Analytics).unwrap();

    assert_eq!(first.total_rows(), second.total_rows());

    let analytics = open(Destination::Analytics, &config.analytics.db_path).unwrap();
    let monthly = count(&analytics, "brent_monthly");
    assert_eq!(monthly as usize, first.tables[0].rows);
}

#[test]
fn full_pipeline_reports_both_load_outcomes() {
    let dir = TempDir::new().unwrap();
    let config = seeded_config(&dir);

    let report = run_pipeline(&config, true).unwrap();
    assert!(report.all_loads_ok());
    assert!(!report.run_id.is_empty());

    // The report landed on disk.
    let reports_dir = config.data_dir().join("reports");
    let reports: Vec<_> = std::fs::read_dir(&reports_dir).unwrap().collect();
    assert_eq!(reports.len(), 1);
}

#[test]
fn missing_fuel_archive_fails_extract_offline() {
    let dir = TempDir::new().unwrap();
    let mut config = PipelineConfig::default();
    config.pipeline.data_dir = dir.path().join("data");

    let raw = sources::raw_dir(config.data_dir());
    write_brent_csv(&raw, &synthetic_brent(d(2024, 1, 1), d(2024, 1, 31))).unwrap();
    write_currency_csv(&raw, &synthetic_currency(d(2024, 1, 1), d(2024, 1, 31))).unwrap();
    // No fuel archive on disk.

    let err = run_extract(&config, true).unwrap_err();
    assert!(err.to_string().contains("unavailable"));
}
