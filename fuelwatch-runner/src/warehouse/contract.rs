//! Logical column contracts, one per destination table.
//!
//! The loader must match each table's fixed column list exactly: required
//! columns present (fails with `SchemaError` otherwise), extra artifact
//! columns dropped, and the known optional columns tolerated when absent.

use fuelwatch_core::SchemaError;
use polars::prelude::DataFrame;

#[derive(Debug, Clone, Copy)]
pub struct TableContract {
    pub table: &'static str,

    /// Natural-key columns; the upsert conflict target. Empty for tables
    /// keyed by a synthetic id, which plain-insert instead.
    pub conflict_keys: &'static [&'static str],

    /// Non-key value columns, updated in place on a key conflict.
    pub value_columns: &'static [&'static str],

    /// Columns the table tolerates being absent from the artifact.
    pub optional_columns: &'static [&'static str],
}

impl TableContract {
    /// Required artifact columns, in insert order.
    pub fn required_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.conflict_keys
            .iter()
            .chain(self.value_columns.iter())
            .copied()
    }

    /// Insert column list for this artifact: the required columns plus
    /// whichever optional columns it actually carries. Anything else the
    /// artifact holds is dropped.
    pub fn insert_columns(&self, df: &DataFrame) -> Vec<&'static str> {
        let mut columns: Vec<&'static str> = self.required_columns().collect();
        for optional in self.optional_columns {
            if df.column(optional).is_ok() {
                columns.push(optional);
            }
        }
        columns
    }

    pub fn validate(&self, df: &DataFrame) -> Result<(), SchemaError> {
        for column in self.required_columns() {
            if df.column(column).is_err() {
                return Err(SchemaError::MissingTableColumn {
                    table: self.table.to_string(),
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    const CONTRACT: TableContract = TableContract {
        table: "currency_monthly",
        conflict_keys: &["date"],
        value_columns: &["official_rate", "parallel_rate"],
        optional_columns: &["spread_pct"],
    };

    #[test]
    fn validate_rejects_missing_required_column() {
        let df = df!("date" => &["2024-01-31"]).unwrap();

        let err = CONTRACT.validate(&df).unwrap_err();
        assert!(err.to_string().contains("official_rate"));
    }

    #[test]
    fn optional_column_may_be_absent() {
        let df = df!(
            "date" => &["2024-01-31"],
            "official_rate" => &[101.0],
            "parallel_rate" => &[182.0],
        )
        .unwrap();

        assert!(CONTRACT.validate(&df).is_ok());
        assert_eq!(
            CONTRACT.insert_columns(&df),
            vec!["date", "official_rate", "parallel_rate"]
        );
    }

    #[test]
    fn optional_column_is_included_when_present() {
        let df = df!(
            "date" => &["2024-01-31"],
            "official_rate" => &[101.0],
            "parallel_rate" => &[182.0],
            "spread_pct" => &[80.198],
        )
        .unwrap();

        assert_eq!(
            CONTRACT.insert_columns(&df),
            vec!["date", "official_rate", "parallel_rate", "spread_pct"]
        );
    }

    #[test]
    fn extra_artifact_columns_are_not_inserted() {
        let df = df!(
            "date" => &["2024-01-31"],
            "official_rate" => &[101.0],
            "parallel_rate" => &[182.0],
            "debug_note" => &["scratch"],
        )
        .unwrap();

        let columns = CONTRACT.insert_columns(&df);
        assert!(!columns.contains(&"debug_note"));
    }
}
