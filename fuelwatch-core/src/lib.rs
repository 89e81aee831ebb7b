//! FuelWatch Core — transform engine for the commodity, fuel, and currency price pipeline.
//!
//! This crate contains the stateless transform stages:
//! - Domain types (typed rows, rate sources, the canonical product vocabulary)
//! - Column-name normalization and required-column validation
//! - Per-source cleaners (type coercion, domain filters, dedup, vocabulary mapping)
//! - Monthly aggregation (mean/median/min/max/sum at calendar month-end grain)
//! - Typed-row ↔ DataFrame bridging shared with the warehouse loaders downstream
//!
//! Every stage takes an immutable input and returns a fresh artifact; nothing
//! here holds state between runs.

pub mod aggregate;
pub mod calendar;
pub mod clean;
pub mod domain;
pub mod error;
pub mod frame;
pub mod schema;

pub use error::TransformError;
pub use schema::SchemaError;
