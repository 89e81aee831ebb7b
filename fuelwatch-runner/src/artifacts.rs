//! Processed-artifact store.
//!
//! Transform output crosses the stage boundary as Parquet files under
//! `{data_dir}/processed/`; the load stages read them back independently.
//! Writes are atomic: write to `.tmp`, rename into place.

use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact io error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parquet error for artifact '{name}': {source}")]
    Parquet {
        name: String,
        #[source]
        source: PolarsError,
    },

    #[error("artifact '{name}' not found at '{path}' — run the transform stage first")]
    Missing { name: String, path: String },
}

/// The six artifacts one transform run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    BrentClean,
    FuelClean,
    CurrencyClean,
    BrentMonthly,
    FuelMonthly,
    CurrencyMonthly,
}

impl Artifact {
    pub const ALL: [Artifact; 6] = [
        Artifact::BrentClean,
        Artifact::FuelClean,
        Artifact::CurrencyClean,
        Artifact::BrentMonthly,
        Artifact::FuelMonthly,
        Artifact::CurrencyMonthly,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Artifact::BrentClean => "brent_clean",
            Artifact::FuelClean => "fuel_clean",
            Artifact::CurrencyClean => "currency_clean",
            Artifact::BrentMonthly => "brent_monthly",
            Artifact::FuelMonthly => "fuel_monthly",
            Artifact::CurrencyMonthly => "currency_monthly",
        }
    }

    fn file_name(&self) -> String {
        format!("{}.parquet", self.name())
    }
}

/// Parquet store rooted at `{data_dir}/processed/`.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: data_dir.into().join("processed"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one artifact atomically; returns its final path.
    pub fn write(&self, artifact: Artifact, df: &DataFrame) -> Result<PathBuf, ArtifactError> {
        fs::create_dir_all(&self.dir).map_err(|source| ArtifactError::Io {
            path: self.dir.display().to_string(),
            source,
        })?;

        let path = self.dir.join(artifact.file_name());
        let tmp = self.dir.join(format!("{}.parquet.tmp", artifact.name()));

        let file = fs::File::create(&tmp).map_err(|source| ArtifactError::Io {
            path: tmp.display().to_string(),
            source,
        })?;
        ParquetWriter::new(file)
            .finish(&mut df.clone())
            .map_err(|source| ArtifactError::Parquet {
                name: artifact.name().to_string(),
                source,
            })?;

        fs::rename(&tmp, &path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            ArtifactError::Io {
                path: path.display().to_string(),
                source,
            }
        })?;

        Ok(path)
    }

    pub fn read(&self, artifact: Artifact) -> Result<DataFrame, ArtifactError> {
        let path = self.dir.join(artifact.file_name());
        if !path.exists() {
            return Err(ArtifactError::Missing {
                name: artifact.name().to_string(),
                path: path.display().to_string(),
            });
        }

        let file = fs::File::open(&path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        ParquetReader::new(file)
            .finish()
            .map_err(|source| ArtifactError::Parquet {
                name: artifact.name().to_string(),
                source,
            })
    }
}

/// The complete transform output, as loaded by either destination.
#[derive(Debug, Clone)]
pub struct TransformArtifacts {
    pub brent_clean: DataFrame,
    pub fuel_clean: DataFrame,
    pub currency_clean: DataFrame,
    pub brent_monthly: DataFrame,
    pub fuel_monthly: DataFrame,
    pub currency_monthly: DataFrame,
}

impl TransformArtifacts {
    pub fn write_all(&self, store: &ArtifactStore) -> Result<(), ArtifactError> {
        store.write(Artifact::BrentClean, &self.brent_clean)?;
        store.write(Artifact::FuelClean, &self.fuel_clean)?;
        store.write(Artifact::CurrencyClean, &self.currency_clean)?;
        store.write(Artifact::BrentMonthly, &self.brent_monthly)?;
        store.write(Artifact::FuelMonthly, &self.fuel_monthly)?;
        store.write(Artifact::CurrencyMonthly, &self.currency_monthly)?;
        Ok(())
    }

    pub fn read_all(store: &ArtifactStore) -> Result<Self, ArtifactError> {
        Ok(Self {
            brent_clean: store.read(Artifact::BrentClean)?,
            fuel_clean: store.read(Artifact::FuelClean)?,
            currency_clean: store.read(Artifact::CurrencyClean)?,
            brent_monthly: store.read(Artifact::BrentMonthly)?,
            fuel_monthly: store.read(Artifact::FuelMonthly)?,
            currency_monthly: store.read(Artifact::CurrencyMonthly)?,
        })
    }
}
