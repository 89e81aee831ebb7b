//! Warehouse destinations and the idempotent bulk loader.
//!
//! Two destinations — the local staging store and the analytics warehouse —
//! with independent DDL and independent failure domains. Each load unit
//! opens its own connection, runs truncate + bulk insert + upsert inside a
//! single transaction, and commits only at the end: dropping the
//! transaction on any error path rolls every change back, so a partial
//! load of one artifact is never visible.

pub mod analytics;
pub mod contract;
pub mod ddl;
pub mod loader;
pub mod staging;

use crate::artifacts::TransformArtifacts;
use fuelwatch_core::SchemaError;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// The two load targets. Disjoint systems; neither reads the other's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Staging,
    Analytics,
}

impl Destination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Destination::Staging => "staging",
            Destination::Analytics => "analytics",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("cannot open {destination} warehouse at '{path}': {source}")]
    Connection {
        destination: Destination,
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("sql error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("artifact read error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),

    #[error("table '{table}': column '{column}' has unsupported type {dtype}")]
    UnsupportedColumnType {
        table: String,
        column: String,
        dtype: String,
    },

    #[error("table '{table}': null in required column '{column}' at row {row}")]
    NullValue {
        table: String,
        column: String,
        row: usize,
    },

    #[error("warehouse io error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Open a connection to one destination and make sure its tables exist.
/// The connection is scoped to a single load unit and closed on drop,
/// on every exit path.
pub fn open(dest: Destination, path: &Path) -> Result<Connection, WarehouseError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| WarehouseError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
    }
    let conn = Connection::open(path).map_err(|source| WarehouseError::Connection {
        destination: dest,
        path: path.display().to_string(),
        source,
    })?;
    ddl::init(&conn, dest)?;
    Ok(conn)
}

/// Row count loaded into one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableLoad {
    pub table: String,
    pub rows: usize,
}

/// Per-destination load summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationReport {
    pub destination: Destination,
    pub tables: Vec<TableLoad>,
}

impl DestinationReport {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

/// Load one destination's artifact set: the three clean artifacts into
/// staging, the three monthly artifacts into analytics.
pub fn load_destination(
    dest: Destination,
    path: &Path,
    artifacts: &TransformArtifacts,
    truncate: bool,
) -> Result<DestinationReport, WarehouseError> {
    let mut conn = open(dest, path)?;

    let tables = match dest {
        Destination::Staging => vec![
            TableLoad {
                table: staging::BRENT_PRICE.table.to_string(),
                rows: staging::load_brent_clean(&mut conn, &artifacts.brent_clean, truncate)?,
            },
            TableLoad {
                table: staging::FUEL_PRICES.table.to_string(),
                rows: staging::load_fuel_clean(&mut conn, &artifacts.fuel_clean, truncate)?,
            },
            TableLoad {
                table: staging::CURRENCY_RATES.table.to_string(),
                rows: staging::load_currency_clean(&mut conn, &artifacts.currency_clean, truncate)?,
            },
        ],
        Destination::Analytics => vec![
            TableLoad {
                table: analytics::BRENT_MONTHLY.table.to_string(),
                rows: analytics::load_brent_monthly(&mut conn, &artifacts.brent_monthly, truncate)?,
            },
            TableLoad {
                table: analytics::FUEL_MONTHLY.table.to_string(),
                rows: analytics::load_fuel_monthly(&mut conn, &artifacts.fuel_monthly, truncate)?,
            },
            TableLoad {
                table: analytics::CURRENCY_MONTHLY.table.to_string(),
                rows: analytics::load_currency_monthly(
                    &mut conn,
                    &artifacts.currency_monthly,
                    truncate,
                )?,
            },
        ],
    };

    Ok(DestinationReport {
        destination: dest,
        tables,
    })
}
