//! The idempotent bulk load for one (artifact, table) unit.
//!
//! One transaction per unit: truncate (when requested), then a prepared
//! insert executed per row — the engine's bulk path — with an upsert on
//! the table's natural key. The transaction commits at the very end; any
//! error drops it and rolls everything back, so repeated runs converge
//! and partial loads are never visible.

use super::contract::TableContract;
use super::WarehouseError;
use chrono::NaiveDate;
use polars::prelude::*;
use rusqlite::types::Value;
use rusqlite::Connection;
use tracing::{debug, info};

/// Pre-extracted column values ready for binding; `None` marks SQL NULL.
type ColumnValues = Vec<Option<Value>>;

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}

fn column_values(table: &str, name: &str, col: &Column) -> Result<ColumnValues, WarehouseError> {
    match col.dtype() {
        DataType::Date => Ok(col
            .date()?
            .into_iter()
            .map(|days| {
                days.map(|d| {
                    let date = epoch() + chrono::Duration::days(d as i64);
                    Value::Text(date.format("%Y-%m-%d").to_string())
                })
            })
            .collect()),
        DataType::Float64 => Ok(col
            .f64()?
            .into_iter()
            .map(|value| value.map(Value::Real))
            .collect()),
        DataType::Int64 => Ok(col
            .i64()?
            .into_iter()
            .map(|value| value.map(Value::Integer))
            .collect()),
        DataType::UInt32 => Ok(col
            .u32()?
            .into_iter()
            .map(|value| value.map(|v| Value::Integer(v as i64)))
            .collect()),
        DataType::String => Ok(col
            .str()?
            .into_iter()
            .map(|value| value.map(|s| Value::Text(s.to_string())))
            .collect()),
        other => Err(WarehouseError::UnsupportedColumnType {
            table: table.to_string(),
            column: name.to_string(),
            dtype: format!("{other:?}"),
        }),
    }
}

fn insert_sql(contract: &TableContract, columns: &[&'static str]) -> String {
    let column_list = columns.join(", ");
    let placeholders = vec!["?"; columns.len()].join(", ");
    let mut sql = format!(
        "INSERT INTO {} ({column_list}, load_timestamp) VALUES ({placeholders}, datetime('now'))",
        contract.table
    );

    if !contract.conflict_keys.is_empty() {
        let keys = contract.conflict_keys.join(", ");
        let updates: Vec<String> = columns
            .iter()
            .copied()
            .filter(|column| !contract.conflict_keys.contains(column))
            .map(|column| format!("{column} = excluded.{column}"))
            .collect();
        sql.push_str(&format!(
            " ON CONFLICT({keys}) DO UPDATE SET {}, load_timestamp = datetime('now')",
            updates.join(", ")
        ));
    }

    sql
}

/// Load one artifact into one table. Returns the number of rows loaded.
pub fn load_table(
    conn: &mut Connection,
    contract: &TableContract,
    df: &DataFrame,
    truncate: bool,
) -> Result<usize, WarehouseError> {
    contract.validate(df)?;

    // Select and reorder artifact columns to match the table contract.
    let columns = contract.insert_columns(df);
    let mut values: Vec<ColumnValues> = Vec::with_capacity(columns.len());
    for name in &columns {
        values.push(column_values(contract.table, name, df.column(name)?)?);
    }

    let sql = insert_sql(contract, &columns);
    let rows = df.height();

    let tx = conn.transaction()?;
    if truncate {
        debug!(table = contract.table, "truncating before load");
        tx.execute(&format!("DELETE FROM {}", contract.table), [])?;
    }
    {
        let mut stmt = tx.prepare(&sql)?;
        for row in 0..rows {
            let mut params: Vec<Value> = Vec::with_capacity(columns.len());
            for (ci, column) in columns.iter().enumerate() {
                match values[ci][row].clone() {
                    Some(value) => params.push(value),
                    None if contract.optional_columns.contains(column) => {
                        params.push(Value::Null);
                    }
                    None => {
                        // Dropping out here rolls back the whole unit.
                        return Err(WarehouseError::NullValue {
                            table: contract.table.to_string(),
                            column: column.to_string(),
                            row,
                        });
                    }
                }
            }
            stmt.execute(rusqlite::params_from_iter(params))?;
        }
    }
    tx.commit()?;

    info!(table = contract.table, rows, truncate, "load unit committed");
    Ok(rows)
}
