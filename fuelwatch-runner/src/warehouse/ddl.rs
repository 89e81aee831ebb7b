//! Fixed DDL, one script per destination.
//!
//! No migration tooling: tables are created idempotently when a
//! destination is opened. The analytics tables cluster on their natural
//! key (`WITHOUT ROWID`), the staging tables favor cheap appends.

use super::{Destination, WarehouseError};
use rusqlite::Connection;

pub const STAGING_DDL: &str = "
CREATE TABLE IF NOT EXISTS brent_price (
    date            TEXT NOT NULL,
    price           REAL NOT NULL,
    load_timestamp  TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (date)
);

CREATE TABLE IF NOT EXISTS fuel_prices (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    period          TEXT NOT NULL,
    province        TEXT NOT NULL,
    flag            TEXT NOT NULL,
    product         TEXT NOT NULL,
    pump_price      REAL NOT NULL,
    volume          REAL NOT NULL,
    load_timestamp  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_fuel_prices_period_product
    ON fuel_prices (period, product);

CREATE TABLE IF NOT EXISTS currency_rates (
    date            TEXT NOT NULL,
    source          TEXT NOT NULL,
    buy_rate        REAL NOT NULL,
    sell_rate       REAL NOT NULL,
    load_timestamp  TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (date, source)
);
";

pub const ANALYTICS_DDL: &str = "
CREATE TABLE IF NOT EXISTS brent_monthly (
    date            TEXT NOT NULL,
    avg_price       REAL NOT NULL,
    load_timestamp  TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (date)
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS fuel_monthly (
    period          TEXT NOT NULL,
    product         TEXT NOT NULL,
    median_price    REAL NOT NULL,
    total_volume    REAL NOT NULL,
    load_timestamp  TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (period, product)
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS currency_monthly (
    date            TEXT NOT NULL,
    official_rate   REAL NOT NULL,
    parallel_rate   REAL NOT NULL,
    spread_pct      REAL,
    load_timestamp  TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (date)
) WITHOUT ROWID;
";

/// Create this destination's tables if they do not exist yet.
pub fn init(conn: &Connection, dest: Destination) -> Result<(), WarehouseError> {
    let ddl = match dest {
        Destination::Staging => STAGING_DDL,
        Destination::Analytics => ANALYTICS_DDL,
    };
    conn.execute_batch(ddl)?;
    Ok(())
}
