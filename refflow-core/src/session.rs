//! Analysis Session
//!
//! Holds the dataset currently under analysis. Loading replaces it, clearing
//! drops it; analyses never mutate it.

use crate::analysis::analyze;
use crate::dataset::{InputOptions, load_csv, load_csv_path};
use crate::error::{EstimatorError, Result};
use crate::params::ProjectParameters;
use crate::result::EstimationResult;
use crate::series::ConsumptionSeries;
use std::io::Read;
use std::path::Path;

/// Currently loaded dataset and where it came from
#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    dataset: Option<ConsumptionSeries>,
    source: Option<String>,
}

impl AnalysisSession {
    /// Empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the loaded dataset
    pub fn load(&mut self, series: ConsumptionSeries, source: impl Into<String>) {
        let source = source.into();
        tracing::info!(readings = series.len(), source = %source, "dataset loaded");
        self.dataset = Some(series);
        self.source = Some(source);
    }

    /// Load a dataset from CSV
    ///
    /// On error the previously loaded dataset is kept.
    pub fn load_csv<R: Read>(
        &mut self,
        reader: R,
        source: impl Into<String>,
        options: &InputOptions,
    ) -> Result<&ConsumptionSeries> {
        let series = load_csv(reader, options)?;
        self.load(series, source);
        self.dataset()
            .ok_or_else(|| EstimatorError::invalid("no dataset loaded"))
    }

    /// Load a dataset from a CSV file
    pub fn load_csv_path(
        &mut self,
        path: &Path,
        options: &InputOptions,
    ) -> Result<&ConsumptionSeries> {
        let series = load_csv_path(path, options)?;
        self.load(series, path.display().to_string());
        self.dataset()
            .ok_or_else(|| EstimatorError::invalid("no dataset loaded"))
    }

    /// Drop the loaded dataset
    pub fn clear(&mut self) {
        if self.dataset.take().is_some() {
            tracing::debug!("dataset cleared");
        }
        self.source = None;
    }

    /// Loaded dataset, if any
    pub fn dataset(&self) -> Option<&ConsumptionSeries> {
        self.dataset.as_ref()
    }

    /// Where the loaded dataset came from
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Whether a dataset is loaded
    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    /// Analyse the loaded dataset
    pub fn analyze(&self, params: &ProjectParameters) -> Result<EstimationResult> {
        let series = self
            .dataset
            .as_ref()
            .ok_or_else(|| EstimatorError::invalid("no dataset loaded"))?;
        analyze(series, params)
    }
}
