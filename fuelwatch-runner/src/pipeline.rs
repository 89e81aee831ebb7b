//! Pipeline coordinator.
//!
//! Stages run strictly in order: extract → transform, then the two
//! destination loads fan out as independent parallel tasks. The first
//! failing stage aborts the rest of the run; the two loads are independent
//! failure domains whose outcomes are captured separately instead of the
//! first error cancelling the other.

use crate::artifacts::{ArtifactError, ArtifactStore, TransformArtifacts};
use crate::config::PipelineConfig;
use crate::report::{RunReport, StageOutcome};
use crate::sources::{
    self, read_raw_csv, write_brent_csv, write_currency_csv, QuoteClient, SourceError, BRENT_RAW,
    CURRENCY_RAW, FUEL_RAW,
};
use crate::warehouse::{load_destination, Destination, DestinationReport, WarehouseError};
use fuelwatch_core::aggregate::{
    aggregate_brent_monthly, aggregate_currency_monthly, aggregate_fuel_monthly,
};
use fuelwatch_core::clean::{clean_brent, clean_currency, clean_fuel, CleanReport};
use fuelwatch_core::TransformError;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("extract failed: {0}")]
    Extract(#[from] SourceError),

    #[error("transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("artifact store: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("{destination} load failed: {source}")]
    Load {
        destination: Destination,
        #[source]
        source: WarehouseError,
    },

    #[error("report io error: {0}")]
    Report(#[from] std::io::Error),
}

/// Raw row counts landed by the extract stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExtractSummary {
    pub brent_rows: usize,
    pub fuel_rows: usize,
    pub currency_rows: usize,
}

/// Clean reports plus monthly artifact sizes from the transform stage.
#[derive(Debug, Clone, Serialize)]
pub struct TransformSummary {
    pub brent: CleanReport,
    pub fuel: CleanReport,
    pub currency: CleanReport,
    pub brent_monthly_rows: usize,
    pub fuel_monthly_rows: usize,
    pub currency_monthly_rows: usize,
}

/// Fetch the two quote APIs and land everything under `{data_dir}/raw/`.
/// The fuel archive comes from an external conversion step and must
/// already be on disk. With `offline`, existing raw files are reused.
pub fn run_extract(
    config: &PipelineConfig,
    offline: bool,
) -> Result<ExtractSummary, PipelineError> {
    let raw = sources::raw_dir(config.data_dir());

    if !offline {
        let client = QuoteClient::new();
        let today = chrono::Local::now().date_naive();

        let brent = client.fetch_brent(config.sources.brent_start, today)?;
        write_brent_csv(&raw, &brent)?;

        let currency = client.fetch_currency(config.sources.currency_start)?;
        write_currency_csv(&raw, &currency)?;
    }

    // Presence check doubles as the offline path's whole job.
    let brent_rows = read_raw_csv(&raw.join(BRENT_RAW))?.height();
    let fuel_rows = read_raw_csv(&raw.join(FUEL_RAW))?.height();
    let currency_rows = read_raw_csv(&raw.join(CURRENCY_RAW))?.height();

    info!(brent_rows, fuel_rows, currency_rows, "extract complete");
    Ok(ExtractSummary {
        brent_rows,
        fuel_rows,
        currency_rows,
    })
}

/// Clean and aggregate all three series, persisting the six artifacts.
pub fn run_transform(config: &PipelineConfig) -> Result<TransformSummary, PipelineError> {
    let raw = sources::raw_dir(config.data_dir());

    let brent_raw = read_raw_csv(&raw.join(BRENT_RAW))?;
    let fuel_raw = read_raw_csv(&raw.join(FUEL_RAW))?;
    let currency_raw = read_raw_csv(&raw.join(CURRENCY_RAW))?;

    let brent = clean_brent(&brent_raw, Some(config.sources.brent_start))?;
    let fuel = clean_fuel(&fuel_raw, config.sources.fuel_start)?;
    let currency = clean_currency(&currency_raw, Some(config.sources.currency_start))?;

    let artifacts = TransformArtifacts {
        brent_monthly: aggregate_brent_monthly(&brent.frame)?,
        fuel_monthly: aggregate_fuel_monthly(&fuel.frame)?,
        currency_monthly: aggregate_currency_monthly(&currency.frame)?,
        brent_clean: brent.frame,
        fuel_clean: fuel.frame,
        currency_clean: currency.frame,
    };

    let store = ArtifactStore::new(config.data_dir());
    artifacts.write_all(&store)?;

    let summary = TransformSummary {
        brent: brent.report,
        fuel: fuel.report,
        currency: currency.report,
        brent_monthly_rows: artifacts.brent_monthly.height(),
        fuel_monthly_rows: artifacts.fuel_monthly.height(),
        currency_monthly_rows: artifacts.currency_monthly.height(),
    };
    info!(
        brent = summary.brent.rows_out,
        fuel = summary.fuel.rows_out,
        currency = summary.currency.rows_out,
        "transform complete"
    );
    Ok(summary)
}

/// Load the persisted artifacts into one destination.
pub fn run_load(
    config: &PipelineConfig,
    dest: Destination,
) -> Result<DestinationReport, PipelineError> {
    let store = ArtifactStore::new(config.data_dir());
    let artifacts = TransformArtifacts::read_all(&store)?;

    let report = load_destination(
        dest,
        config.db_path(dest),
        &artifacts,
        config.pipeline.truncate,
    )
    .map_err(|source| PipelineError::Load {
        destination: dest,
        source,
    })?;

    info!(destination = %dest, rows = report.total_rows(), "load complete");
    Ok(report)
}

/// Run both destination loads as parallel tasks. The outcomes are
/// independent: one destination failing never cancels or rolls back the
/// other.
pub fn run_loads_parallel(
    config: &PipelineConfig,
) -> (
    Result<DestinationReport, PipelineError>,
    Result<DestinationReport, PipelineError>,
) {
    rayon::join(
        || run_load(config, Destination::Staging),
        || run_load(config, Destination::Analytics),
    )
}

/// One full run: extract → transform → both loads in parallel.
///
/// Extract and transform failures abort the run. Load failures do not
/// cancel the sibling load; each outcome lands in the report, and the
/// report is written either way.
pub fn run_pipeline(config: &PipelineConfig, offline: bool) -> Result<RunReport, PipelineError> {
    let started = Instant::now();

    let extract = run_extract(config, offline)?;
    let transform = run_transform(config)?;

    let (staging, analytics) = run_loads_parallel(config);

    for outcome in [&staging, &analytics] {
        if let Err(e) = outcome {
            error!(error = %e, "destination load failed");
        }
    }

    let report = RunReport {
        run_id: config.run_id(),
        timestamp: chrono::Utc::now(),
        duration_secs: started.elapsed().as_secs_f64(),
        truncate: config.pipeline.truncate,
        extract,
        transform,
        load_staging: StageOutcome::from_result(staging),
        load_analytics: StageOutcome::from_result(analytics),
    };
    report.write(config.data_dir())?;

    Ok(report)
}
