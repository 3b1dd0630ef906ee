//! Reference Consumption Estimator
//!
//! Turns a consumption series and a design percentile into the reference
//! consumption used as the sizing basis.
//!
//! - [`EstimationModel::Percentile`]: interpolated percentile of the readings.
//! - [`EstimationModel::Kde`]: first KDE grid point whose cumulative
//!   probability reaches the percentile. This is an approximation whose
//!   resolution is the grid spacing, not an exact quantile inversion.

use crate::error::{EstimatorError, Result};
use crate::params::EstimationModel;
use crate::series::ConsumptionSeries;
use refflow_stats::{GaussianKde, KdeConfig, KdeCurve, compute_percentile};

/// Interpolated percentile of the readings (`percentile` in 0-100)
pub fn percentile_estimate(series: &ConsumptionSeries, percentile: f64) -> Result<f64> {
    compute_percentile(series.values(), percentile)
        .map_err(|e| EstimatorError::from_stats("percentile", e))
}

/// Grid quantile of an evaluated KDE (`percentile` in 0-100)
pub fn kde_estimate(curve: &KdeCurve, percentile: f64) -> Result<f64> {
    curve
        .quantile(percentile)
        .map_err(|e| EstimatorError::from_stats("KDE", e))
}

/// Fit the KDE of a series and evaluate it on its grid
pub fn fit_density(series: &ConsumptionSeries, config: &KdeConfig) -> Result<KdeCurve> {
    let kde =
        GaussianKde::fit(series.values(), config).map_err(|e| EstimatorError::from_stats("KDE", e))?;
    let curve = kde
        .evaluate(config)
        .map_err(|e| EstimatorError::from_stats("KDE", e))?;

    tracing::debug!(
        bandwidth = curve.bandwidth,
        grid_points = curve.len(),
        resolution = curve.resolution(),
        "fitted kernel density"
    );
    Ok(curve)
}

/// Estimate the reference consumption, fitting a fresh KDE if the model needs one
pub fn estimate_reference(
    series: &ConsumptionSeries,
    percentile: f64,
    model: EstimationModel,
    config: &KdeConfig,
) -> Result<f64> {
    match model {
        EstimationModel::Percentile => percentile_estimate(series, percentile),
        EstimationModel::Kde => kde_estimate(&fit_density(series, config)?, percentile),
    }
}

/// Estimate the reference consumption from an already evaluated KDE
pub(crate) fn estimate_with_curve(
    series: &ConsumptionSeries,
    percentile: f64,
    model: EstimationModel,
    curve: &KdeCurve,
) -> Result<f64> {
    match model {
        EstimationModel::Percentile => percentile_estimate(series, percentile),
        EstimationModel::Kde => kde_estimate(curve, percentile),
    }
}
