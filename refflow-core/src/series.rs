//! Consumption Series
//!
//! Historical monthly consumption readings (m³), one per month, in the order
//! they were recorded.

use crate::error::{EstimatorError, Result};
use serde::{Deserialize, Serialize};

/// Ordered, validated monthly consumption readings
///
/// Labels (usually the month) are carried for display only and never validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionSeries {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl ConsumptionSeries {
    /// Build a series from readings, labelling them by position
    pub fn new(values: Vec<f64>) -> Result<Self> {
        let labels = (1..=values.len()).map(|i| i.to_string()).collect();
        Self::with_labels(labels, values)
    }

    /// Build a series from labels and readings of equal length
    ///
    /// Every reading must be a finite, non-negative volume.
    pub fn with_labels(labels: Vec<String>, values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(EstimatorError::invalid("consumption series is empty"));
        }
        if labels.len() != values.len() {
            return Err(EstimatorError::invalid(format!(
                "{} labels for {} consumption values",
                labels.len(),
                values.len()
            )));
        }
        for (label, &value) in labels.iter().zip(&values) {
            if !value.is_finite() {
                return Err(EstimatorError::invalid(format!(
                    "consumption for '{}' is not a finite number",
                    label
                )));
            }
            if value < 0.0 {
                return Err(EstimatorError::invalid(format!(
                    "consumption for '{}' is negative ({})",
                    label, value
                )));
            }
        }
        Ok(Self { labels, values })
    }

    /// Readings in m³
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Display labels
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of readings
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: a series holds at least one reading
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest reading
    pub fn max(&self) -> f64 {
        self.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest reading
    pub fn min(&self) -> f64 {
        self.values.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    /// Iterate over (label, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}
