//! Staging destination: the three row-level clean artifacts.

use super::contract::TableContract;
use super::loader::load_table;
use super::WarehouseError;
use polars::prelude::DataFrame;
use rusqlite::Connection;
use tracing::warn;

pub const BRENT_PRICE: TableContract = TableContract {
    table: "brent_price",
    conflict_keys: &["date"],
    value_columns: &["price"],
    optional_columns: &[],
};

/// Keyed by a synthetic id, so this is a full-replace table: there is no
/// natural key to converge on.
pub const FUEL_PRICES: TableContract = TableContract {
    table: "fuel_prices",
    conflict_keys: &[],
    value_columns: &["period", "province", "flag", "product", "pump_price", "volume"],
    optional_columns: &[],
};

pub const CURRENCY_RATES: TableContract = TableContract {
    table: "currency_rates",
    conflict_keys: &["date", "source"],
    value_columns: &["buy_rate", "sell_rate"],
    optional_columns: &[],
};

pub fn load_brent_clean(
    conn: &mut Connection,
    df: &DataFrame,
    truncate: bool,
) -> Result<usize, WarehouseError> {
    load_table(conn, &BRENT_PRICE, df, truncate)
}

pub fn load_fuel_clean(
    conn: &mut Connection,
    df: &DataFrame,
    truncate: bool,
) -> Result<usize, WarehouseError> {
    if !truncate {
        warn!(
            table = FUEL_PRICES.table,
            "loading without truncate appends rows; the table has no natural key"
        );
    }
    load_table(conn, &FUEL_PRICES, df, truncate)
}

pub fn load_currency_clean(
    conn: &mut Connection,
    df: &DataFrame,
    truncate: bool,
) -> Result<usize, WarehouseError> {
    load_table(conn, &CURRENCY_RATES, df, truncate)
}
