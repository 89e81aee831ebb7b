//! Per-source cleaners.
//!
//! Each cleaner takes a raw DataFrame (arbitrary header casing, string or
//! native-typed columns) and produces the canonical clean artifact plus a
//! `CleanReport` of row-drop counts. A missing required column aborts the
//! source's run with `SchemaError`; every other anomaly — nulls after
//! coercion, malformed dates, unmappable labels, below-floor prices — is a
//! counted, non-fatal row drop.

mod brent;
mod currency;
mod fuel;

pub use brent::clean_brent;
pub use currency::clean_currency;
pub use fuel::{clean_fuel, PUMP_PRICE_FLOOR};

use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{info, warn};

/// Row-drop accounting for one cleaning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub rows_in: usize,
    pub null_dropped: usize,
    pub duplicate_dropped: usize,
    pub before_cutoff_dropped: usize,
    pub below_floor_dropped: usize,
    pub unmapped_dropped: usize,
    pub rows_out: usize,
}

impl CleanReport {
    pub(crate) fn log(&self, source: &str) {
        if self.null_dropped > 0 {
            info!(source, count = self.null_dropped, "dropped rows with nulls in required fields");
        }
        if self.duplicate_dropped > 0 {
            info!(source, count = self.duplicate_dropped, "dropped duplicate rows");
        }
        if self.before_cutoff_dropped > 0 {
            info!(source, count = self.before_cutoff_dropped, "dropped rows before the configured start date");
        }
        if self.below_floor_dropped > 0 {
            info!(source, count = self.below_floor_dropped, "dropped rows below the price floor");
        }
        if self.unmapped_dropped > 0 {
            warn!(source, count = self.unmapped_dropped, "dropped rows with unmappable labels");
        }
        info!(source, rows_in = self.rows_in, rows_out = self.rows_out, "cleaning finished");
    }
}

/// A cleaned artifact: the canonical frame plus drop accounting.
#[derive(Debug, Clone)]
pub struct Cleaned {
    pub frame: DataFrame,
    pub report: CleanReport,
}
