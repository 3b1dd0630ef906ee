//! Distribution Curves
//!
//! Chart-ready data describing the shape of a consumption series: histogram,
//! KDE and normal density on a shared grid, and the empirical, KDE and normal
//! cumulative distributions with a marker at the reference value.

use crate::error::{EstimatorError, Result};
use crate::params::EstimationModel;
use crate::series::ConsumptionSeries;
use refflow_stats::{Histogram, KdeCurve, compute_histogram, normal_cdf, normal_pdf};
use serde::{Deserialize, Serialize};

/// Position of the reference consumption on the charts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMarker {
    /// Reference consumption, m³/month
    pub value: f64,
    /// Design percentile it was estimated at
    pub percentile: f64,
    /// Model that produced it
    pub model: EstimationModel,
}

/// Step of the empirical CDF
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmpiricalStep {
    /// Sorted reading
    pub value: f64,
    /// Fraction of readings at or below `value`
    pub probability: f64,
}

/// All curves of one analysis
///
/// `kde.grid` is the shared x-axis for every curve except the histogram and
/// the empirical CDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionCurves {
    /// Histogram of the readings
    pub histogram: Histogram,
    /// KDE density and CDF (the same fit the reference was read from)
    pub kde: KdeCurve,
    /// N(mean, population std-dev) density on the KDE grid
    pub normal_pdf: Vec<f64>,
    /// N(mean, population std-dev) CDF on the KDE grid
    pub normal_cdf: Vec<f64>,
    /// Empirical step CDF of the sorted readings
    pub empirical_cdf: Vec<EmpiricalStep>,
    /// Reference consumption marker
    pub reference_marker: ReferenceMarker,
}

impl DistributionCurves {
    /// Shared x-axis of the density and CDF curves
    pub fn grid(&self) -> &[f64] {
        &self.kde.grid
    }
}

/// Empirical CDF, one step per reading
///
/// Tied readings each get their own step; the last of a run carries the
/// cumulative fraction of the whole run.
pub fn empirical_cdf(values: &[f64]) -> Vec<EmpiricalStep> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len() as f64;
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, value)| EmpiricalStep {
            value,
            probability: (i + 1) as f64 / n,
        })
        .collect()
}

/// Assemble the curves around an already evaluated KDE
pub fn build_curves(
    series: &ConsumptionSeries,
    kde: KdeCurve,
    mean: f64,
    std_dev: f64,
    reference_marker: ReferenceMarker,
) -> Result<DistributionCurves> {
    let histogram = compute_histogram(series.values())
        .map_err(|e| EstimatorError::from_stats("histogram", e))?;

    let normal_pdf = kde.grid.iter().map(|&x| normal_pdf(x, mean, std_dev)).collect();
    let normal_cdf = kde.grid.iter().map(|&x| normal_cdf(x, mean, std_dev)).collect();

    Ok(DistributionCurves {
        histogram,
        normal_pdf,
        normal_cdf,
        empirical_cdf: empirical_cdf(series.values()),
        kde,
        reference_marker,
    })
}
