//! Run report export (JSON), one file per pipeline run.

use crate::pipeline::{ExtractSummary, PipelineError, TransformSummary};
use crate::warehouse::DestinationReport;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of one destination load, captured separately per destination.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    Succeeded { report: DestinationReport },
    Failed { error: String },
}

impl StageOutcome {
    pub fn from_result(result: Result<DestinationReport, PipelineError>) -> Self {
        match result {
            Ok(report) => StageOutcome::Succeeded { report },
            Err(e) => StageOutcome::Failed {
                error: e.to_string(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, StageOutcome::Succeeded { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub duration_secs: f64,
    pub truncate: bool,
    pub extract: ExtractSummary,
    pub transform: TransformSummary,
    pub load_staging: StageOutcome,
    pub load_analytics: StageOutcome,
}

impl RunReport {
    pub fn all_loads_ok(&self) -> bool {
        self.load_staging.is_ok() && self.load_analytics.is_ok()
    }

    /// Write the report under `{data_dir}/reports/`; returns its path.
    pub fn write(&self, data_dir: &Path) -> Result<PathBuf, std::io::Error> {
        let dir = data_dir.join("reports");
        std::fs::create_dir_all(&dir)?;

        let path = dir.join(format!(
            "run_{}.json",
            self.timestamp.format("%Y%m%dT%H%M%SZ")
        ));
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&path, json)?;
        Ok(path)
    }
}
