//! Shared error type for the transform stages.

use crate::schema::SchemaError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors surfaced by cleaning, aggregation, and frame bridging.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("dataframe error: {0}")]
    Frame(#[from] PolarsError),

    #[error("column '{column}' has unsupported type {dtype} for this operation")]
    UnsupportedType { column: String, dtype: String },

    /// A clean artifact failed an invariant the cleaner is supposed to
    /// guarantee (e.g. a null reaching aggregation). Never handled silently.
    #[error("invariant violation: {0}")]
    Invariant(String),
}
