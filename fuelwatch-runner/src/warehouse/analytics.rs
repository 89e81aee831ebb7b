//! Analytics destination: the three monthly artifacts.

use super::contract::TableContract;
use super::loader::load_table;
use super::WarehouseError;
use polars::prelude::DataFrame;
use rusqlite::Connection;

pub const BRENT_MONTHLY: TableContract = TableContract {
    table: "brent_monthly",
    conflict_keys: &["date"],
    value_columns: &["avg_price"],
    optional_columns: &[],
};

pub const FUEL_MONTHLY: TableContract = TableContract {
    table: "fuel_monthly",
    conflict_keys: &["period", "product"],
    value_columns: &["median_price", "total_volume"],
    optional_columns: &[],
};

/// `spread_pct` is the one optional column analytics tables tolerate
/// being absent; an artifact without it loads NULL.
pub const CURRENCY_MONTHLY: TableContract = TableContract {
    table: "currency_monthly",
    conflict_keys: &["date"],
    value_columns: &["official_rate", "parallel_rate"],
    optional_columns: &["spread_pct"],
};

pub fn load_brent_monthly(
    conn: &mut Connection,
    df: &DataFrame,
    truncate: bool,
) -> Result<usize, WarehouseError> {
    load_table(conn, &BRENT_MONTHLY, df, truncate)
}

pub fn load_fuel_monthly(
    conn: &mut Connection,
    df: &DataFrame,
    truncate: bool,
) -> Result<usize, WarehouseError> {
    load_table(conn, &FUEL_MONTHLY, df, truncate)
}

pub fn load_currency_monthly(
    conn: &mut Connection,
    df: &DataFrame,
    truncate: bool,
) -> Result<usize, WarehouseError> {
    load_table(conn, &CURRENCY_MONTHLY, df, truncate)
}
