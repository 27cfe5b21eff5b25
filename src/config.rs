//! Runtime wiring: which catalog to load and where to record events.

use crate::calculation::calculator::RoiCalculator;
use crate::core::catalog::{CatalogError, ScenarioCatalog};
use crate::core::currency::FxRateTable;
use crate::recording::{JsonLinesSink, RecordError, Recorder};
use std::path::PathBuf;
use thiserror::Error;

/// Overrides the embedded catalog.
pub const CATALOG_PATH_ENV: &str = "ROI_CATALOG_PATH";
/// Enables the JSON-lines recorder.
pub const RECORD_PATH_ENV: &str = "ROI_RECORD_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load scenario catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("failed to start recorder: {0}")]
    Recorder(#[from] RecordError),
}

/// Engine settings. `None` means the built-in catalog and no recording.
///
/// The CLI fills these from `--catalog`/`--record` or the matching
/// environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub catalog_path: Option<PathBuf>,
    pub record_path: Option<PathBuf>,
}

impl EngineConfig {
    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    pub fn with_record_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.record_path = Some(path.into());
        self
    }

    pub fn load_catalog(&self) -> Result<ScenarioCatalog, ConfigError> {
        let catalog = match &self.catalog_path {
            Some(path) => {
                log::debug!("loading catalog from {}", path.display());
                ScenarioCatalog::from_path(path)?
            }
            None => ScenarioCatalog::builtin()?,
        };
        log::debug!(
            "catalog ready: {} categories, {} scenarios",
            catalog.categories().count(),
            catalog.scenario_count()
        );
        Ok(catalog)
    }

    pub fn open_recorder(&self) -> Result<Option<Recorder>, ConfigError> {
        match &self.record_path {
            Some(path) => Ok(Some(Recorder::spawn(JsonLinesSink::open(path)?)?)),
            None => Ok(None),
        }
    }

    /// Calculator with the configured catalog, standard rates and recorder.
    pub fn build_calculator(&self) -> Result<RoiCalculator, ConfigError> {
        let calculator = RoiCalculator::new(self.load_catalog()?, FxRateTable::standard());
        Ok(match self.open_recorder()? {
            Some(recorder) => calculator.with_recorder(recorder),
            None => calculator,
        })
    }
}
