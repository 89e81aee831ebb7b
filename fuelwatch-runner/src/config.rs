//! Pipeline configuration.
//!
//! Loaded from a TOML file; every section has defaults so a partial (or
//! absent) file works. Destination paths and the data directory can be
//! overridden from the environment, which is how deployments inject
//! credentials-adjacent settings without editing the file.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::warehouse::Destination;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Everything one pipeline run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub pipeline: PipelineSection,

    #[serde(default = "DestinationConfig::default_staging")]
    pub staging: DestinationConfig,

    #[serde(default = "DestinationConfig::default_analytics")]
    pub analytics: DestinationConfig,
}

/// Per-source start-date cutoffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_start")]
    pub brent_start: NaiveDate,

    #[serde(default = "default_start")]
    pub fuel_start: NaiveDate,

    #[serde(default = "default_start")]
    pub currency_start: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSection {
    /// Root for `raw/`, `processed/`, and `reports/`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Truncate each table before loading (full refresh). Default on.
    #[serde(default = "default_truncate")]
    pub truncate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationConfig {
    pub db_path: PathBuf,
}

fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_truncate() -> bool {
    true
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            brent_start: default_start(),
            fuel_start: default_start(),
            currency_start: default_start(),
        }
    }
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            truncate: default_truncate(),
        }
    }
}

impl DestinationConfig {
    fn default_staging() -> Self {
        Self {
            db_path: PathBuf::from("warehouse/staging.db"),
        }
    }

    fn default_analytics() -> Self {
        Self {
            db_path: PathBuf::from("warehouse/analytics.db"),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sources: SourcesConfig::default(),
            pipeline: PipelineSection::default(),
            staging: DestinationConfig::default_staging(),
            analytics: DestinationConfig::default_analytics(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Environment overrides, applied after the file is read:
    /// `FUELWATCH_DATA_DIR`, `FUELWATCH_STAGING_DB`, `FUELWATCH_ANALYTICS_DB`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("FUELWATCH_DATA_DIR") {
            self.pipeline.data_dir = PathBuf::from(dir);
        }
        if let Ok(path) = std::env::var("FUELWATCH_STAGING_DB") {
            self.staging.db_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("FUELWATCH_ANALYTICS_DB") {
            self.analytics.db_path = PathBuf::from(path);
        }
    }

    /// Deterministic content hash of this configuration.
    pub fn run_id(&self) -> String {
        let json = serde_json::to_string(self).expect("PipelineConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    pub fn data_dir(&self) -> &Path {
        &self.pipeline.data_dir
    }

    pub fn db_path(&self, dest: Destination) -> &Path {
        match dest {
            Destination::Staging => &self.staging.db_path,
            Destination::Analytics => &self.analytics.db_path,
        }
    }
}
